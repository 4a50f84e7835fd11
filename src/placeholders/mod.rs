use std::borrow::Cow;

mod scanner;

use scanner::{
    State, is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    try_start_dollar_quote,
};

use crate::error::StoreError;

/// Numbered placeholder form emitted for the active backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `PostgreSQL`-style placeholders like `$1`.
    Postgres,
    /// `SQLite`-style placeholders like `?1`.
    Sqlite,
}

/// Rewrite bare `?` markers into the backend's numbered positional form,
/// left to right, and validate the marker count against the parameter count.
///
/// Markers inside single-quoted strings, double-quoted identifiers, line and
/// block comments, and dollar-quoted blocks are left alone via a lightweight
/// state machine. No escaping happens here: values always travel as bound
/// parameters, and the statement text itself is a trusted internal string.
///
/// # Errors
/// Returns `StoreError::ParameterError` naming the statement when the number
/// of markers does not match `param_count`.
pub fn bind_markers(
    sql: &str,
    style: PlaceholderStyle,
    param_count: usize,
) -> Result<Cow<'_, str>, StoreError> {
    let mut out: Option<Vec<u8>> = None;
    let mut state = State::Normal;
    let mut idx = 0;
    let mut markers = 0usize;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        let mut emitted = false;
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => state = State::BlockComment(1),
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        // emit the whole opening delimiter in one piece
                        if let Some(ref mut buf) = out {
                            buf.extend_from_slice(&bytes[idx..=advance]);
                        }
                        state = State::DollarQuoted(tag);
                        idx = advance;
                        emitted = true;
                    }
                }
                b'?' => {
                    markers += 1;
                    let buf = out.get_or_insert_with(|| bytes[..idx].to_vec());
                    match style {
                        PlaceholderStyle::Postgres => buf.push(b'$'),
                        PlaceholderStyle::Sqlite => buf.push(b'?'),
                    }
                    buf.extend_from_slice(markers.to_string().as_bytes());
                    emitted = true;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        if let Some(ref mut buf) = out {
                            buf.extend_from_slice(b"''");
                        }
                        idx += 1; // skip escaped quote
                        emitted = true;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        if let Some(ref mut buf) = out {
                            buf.extend_from_slice(b"\"\"");
                        }
                        idx += 1; // skip escaped quote
                        emitted = true;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                } else if is_block_comment_end(bytes, idx) {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    // emit the whole closing delimiter in one piece
                    let end = idx + tag.len() + 1;
                    if let Some(ref mut buf) = out {
                        buf.extend_from_slice(&bytes[idx..=end]);
                    }
                    state = State::Normal;
                    idx = end;
                    emitted = true;
                }
            }
        }

        if let Some(ref mut buf) = out
            && !emitted
        {
            buf.push(b);
        }

        idx += 1;
    }

    if markers != param_count {
        return Err(StoreError::ParameterError(format!(
            "statement has {markers} positional markers but {param_count} parameters were supplied: {sql}"
        )));
    }

    match out {
        // the buffer is the input (valid UTF-8) with ASCII splices
        Some(buf) => String::from_utf8(buf).map(Cow::Owned).map_err(|_| {
            StoreError::ParameterError(format!("statement is not valid UTF-8 after binding: {sql}"))
        }),
        None => Ok(Cow::Borrowed(sql)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_postgres_numbering() {
        let sql = "select * from t where a = ? and b = ?";
        let res = bind_markers(sql, PlaceholderStyle::Postgres, 2).unwrap();
        assert_eq!(res, "select * from t where a = $1 and b = $2");
    }

    #[test]
    fn binds_sqlite_numbering() {
        let sql = "insert into t values(?, ?)";
        let res = bind_markers(sql, PlaceholderStyle::Sqlite, 2).unwrap();
        assert_eq!(res, "insert into t values(?1, ?2)");
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '?', \"we?ird\" -- ?\n/* ? */ from t where a = ?";
        let res = bind_markers(sql, PlaceholderStyle::Postgres, 1).unwrap();
        assert_eq!(res, "select '?', \"we?ird\" -- ?\n/* ? */ from t where a = $1");
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$foo$ select ? from t $foo$ where a = ?";
        let res = bind_markers(sql, PlaceholderStyle::Postgres, 1).unwrap();
        assert_eq!(res, "$foo$ select ? from t $foo$ where a = $1");
    }

    #[test]
    fn dollar_quotes_survive_after_a_replacement() {
        let sql = "select ?, $fn$ body ? $fn$";
        let res = bind_markers(sql, PlaceholderStyle::Postgres, 1).unwrap();
        assert_eq!(res, "select $1, $fn$ body ? $fn$");
    }

    #[test]
    fn non_ascii_text_passes_through() {
        let sql = "select 'café' as c, ? as a";
        let res = bind_markers(sql, PlaceholderStyle::Sqlite, 1).unwrap();
        assert_eq!(res, "select 'café' as c, ?1 as a");
    }

    #[test]
    fn no_markers_borrows_input() {
        let sql = "select 1";
        let res = bind_markers(sql, PlaceholderStyle::Postgres, 0).unwrap();
        assert!(matches!(res, Cow::Borrowed(_)));
    }

    #[test]
    fn count_mismatch_fails_fast_and_names_statement() {
        let sql = "select * from t where a = ? and b = ?";
        let err = bind_markers(sql, PlaceholderStyle::Postgres, 1).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("2 positional markers"));
        assert!(msg.contains("where a = ?"));
    }

    #[test]
    fn escaped_quotes_stay_inside_literal() {
        let sql = "select 'it''s ?' from t where a = ?";
        let res = bind_markers(sql, PlaceholderStyle::Sqlite, 1).unwrap();
        assert_eq!(res, "select 'it''s ?' from t where a = ?1");
    }

    #[test]
    fn marker_past_ten_binds_two_digits() {
        let sql = "select ?,?,?,?,?,?,?,?,?,?,?";
        let res = bind_markers(sql, PlaceholderStyle::Postgres, 11).unwrap();
        assert!(res.ends_with("$10,$11"));
    }
}
