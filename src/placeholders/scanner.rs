#[derive(Clone)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'-' && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'/' && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'*' && bytes.get(idx + 1) == Some(&b'/')
}

/// Try to open a dollar-quoted block at `idx` (which points at `$`).
/// Returns the tag (without delimiters) and the index of the byte that closes
/// the opening delimiter.
pub(super) fn try_start_dollar_quote(bytes: &[u8], idx: usize) -> Option<(String, usize)> {
    let mut end = idx + 1;
    while end < bytes.len() {
        let b = bytes[end];
        if b == b'$' {
            let tag = std::str::from_utf8(&bytes[idx + 1..end]).ok()?;
            return Some((tag.to_string(), end));
        }
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        end += 1;
    }
    None
}

/// Whether the closing delimiter `$tag$` starts at `idx` (which points at `$`).
pub(super) fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let tag_bytes = tag.as_bytes();
    let end = idx + 1 + tag_bytes.len();
    if end >= bytes.len() {
        return false;
    }
    &bytes[idx + 1..end] == tag_bytes && bytes[end] == b'$'
}
