use super::{BuiltStatement, check_table, conjunction, order_fragment};
use crate::error::StoreError;
use crate::fields::{FieldMap, OrderBy};
use crate::types::DbValue;

/// Assemble `SELECT * FROM table [WHERE …] [ORDER BY …]`.
///
/// The WHERE clause comes from the AND-ed `filter` map, or from the trusted
/// `where_expr` fragment with its own `extra_params`; passing both combines
/// them with AND.
///
/// # Errors
/// Returns `StoreError::ParameterError` on an empty table name or empty
/// field-map key.
pub fn select_statement(
    table: &str,
    filter: &FieldMap,
    where_expr: Option<&str>,
    order: Option<&OrderBy>,
    extra_params: &[DbValue],
) -> Result<BuiltStatement, StoreError> {
    check_table(table)?;
    filter.validate()?;

    let mut sql = format!("SELECT * FROM {table}");
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

    sql.push_str(&order_fragment(order));

    Ok(BuiltStatement { sql, params })
}
