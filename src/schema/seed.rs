use crate::error::StoreError;
use crate::fields::FieldMap;
use crate::types::DbValue;

/// Parse a column-headered reference-data file into one field map per row.
///
/// The first line names the columns; every following non-empty line is one
/// record. Values are type-inferred (integer, float, boolean, text) and may
/// be wrapped in double quotes. The header must match the table's DDL
/// column names, or the resulting inserts will fail for that table.
///
/// # Errors
/// Returns `StoreError::SchemaError` when the file has no header or a row's
/// width differs from the header's.
pub fn parse_reference_rows(text: &str) -> Result<Vec<FieldMap>, StoreError> {
    let mut lines = text.lines().map(str::trim_end).filter(|l| !l.is_empty());

    let header: Vec<&str> = lines
        .next()
        .ok_or_else(|| StoreError::SchemaError("reference data file has no header".to_string()))?
        .split(',')
        .map(str::trim)
        .collect();

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        if values.len() != header.len() {
            return Err(StoreError::SchemaError(format!(
                "reference data row {} has {} values but the header names {} columns",
                line_no + 2,
                values.len(),
                header.len()
            )));
        }
        let mut map = FieldMap::new();
        for (column, raw) in header.iter().zip(values) {
            map.insert(*column, infer_value(raw));
        }
        rows.push(map);
    }

    Ok(rows)
}

fn infer_value(raw: &str) -> DbValue {
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    if unquoted != raw {
        return DbValue::Text(unquoted.to_string());
    }
    if let Ok(i) = raw.parse::<i64>() {
        return DbValue::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return DbValue::Float(f);
    }
    match raw {
        "true" => DbValue::Bool(true),
        "false" => DbValue::Bool(false),
        "" => DbValue::Null,
        _ => DbValue::Text(raw.to_string()),
    }
}
