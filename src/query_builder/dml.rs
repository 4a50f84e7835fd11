use super::{BuiltStatement, check_table, conjunction};
use crate::error::StoreError;
use crate::fields::{FieldMap, quote_ident};
use crate::types::DbValue;

/// Assemble `INSERT INTO table (…) VALUES (…) RETURNING *`.
///
/// # Errors
/// Returns `StoreError::ParameterError` on an empty table name, an empty
/// field map, or an empty field-map key.
pub fn insert_statement(table: &str, fields: &FieldMap) -> Result<BuiltStatement, StoreError> {
    check_table(table)?;
    fields.validate()?;
    if fields.is_empty() {
        return Err(StoreError::ParameterError(format!(
            "insert into {table} requires at least one field"
        )));
    }

    let columns: Vec<String> = fields
        .iter()
        .map(|(column, _)| quote_ident(column))
        .collect();
    let markers: Vec<&str> = fields.iter().map(|_| "?").collect();

    Ok(BuiltStatement {
        sql: format!(
            "INSERT INTO {table} ({}) VALUES ({}) RETURNING *",
            columns.join(", "),
            markers.join(", ")
        ),
        params: fields.values(),
    })
}

/// [`insert_statement`] without the RETURNING clause, for bulk paths (such
/// as seeding) that run through plain DML execution.
///
/// # Errors
/// Same conditions as [`insert_statement`].
pub fn seed_insert_statement(table: &str, fields: &FieldMap) -> Result<BuiltStatement, StoreError> {
    let mut built = insert_statement(table, fields)?;
    built.sql.truncate(built.sql.len() - " RETURNING *".len());
    Ok(built)
}

/// Assemble `UPDATE table SET … [WHERE …] RETURNING *`.
///
/// Set values precede filter values in marker order. A zero-entry filter
/// with no fragment updates every row, mirroring the list semantics.
///
/// # Errors
/// Returns `StoreError::ParameterError` on an empty table name, an empty
/// set map, or an empty field-map key.
pub fn update_statement(
    table: &str,
    filter: &FieldMap,
    where_expr: Option<&str>,
    set: &FieldMap,
    extra_params: &[DbValue],
) -> Result<BuiltStatement, StoreError> {
    check_table(table)?;
    filter.validate()?;
    set.validate()?;
    if set.is_empty() {
        return Err(StoreError::ParameterError(format!(
            "update of {table} requires at least one field to set"
        )));
    }

    let assignments: Vec<String> = set
        .iter()
        .map(|(column, _)| format!("{} = ?", quote_ident(column)))
        .collect();

    let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));
    let mut params = set.values();

    let mut clauses: Vec<String> = Vec::new();
    if let Some(conj) = conjunction(filter) {
        clauses.push(conj);
        params.extend(filter.values());
    }
    if let Some(expr) = where_expr {
        clauses.push(expr.to_string());
        params.extend_from_slice(extra_params);
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" RETURNING *");

    Ok(BuiltStatement { sql, params })
}

/// Assemble `DELETE FROM table [WHERE …]`. Deletion is physical.
///
/// # Errors
/// Returns `StoreError::ParameterError` on an empty table name or empty
/// field-map key.
pub fn delete_statement(
    table: &str,
    filter: &FieldMap,
    where_expr: Option<&str>,
    extra_params: &[DbValue],
) -> Result<BuiltStatement, StoreError> {
    check_table(table)?;
    filter.validate()?;

    let mut sql = format!("DELETE FROM {table}");
    let mut params = Vec::with_capacity(filter.len() + extra_params.len());

    let mut clauses: Vec<String> = Vec::new();
    if let Some(conj) = conjunction(filter) {
        clauses.push(conj);
        params.extend(filter.values());
    }
    if let Some(expr) = where_expr {
        clauses.push(expr.to_string());
        params.extend_from_slice(extra_params);
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    Ok(BuiltStatement { sql, params })
}
