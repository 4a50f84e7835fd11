//! SQL assembly for the generic operations.
//!
//! Everything here is pure string building over a table name plus field
//! maps: values always become `?` markers for the placeholder binder, field
//! keys always become identifier-quoted column references. Table names and
//! caller-supplied WHERE fragments are trusted internal strings, interpolated
//! as-is; they must never carry end-user input.

mod dml;
mod select;

pub use dml::{delete_statement, insert_statement, seed_insert_statement, update_statement};
pub use select::select_statement;

use crate::error::StoreError;
use crate::fields::{FieldMap, OrderBy, quote_ident};
use crate::types::DbValue;

/// A generated statement and its parameters in marker order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltStatement {
    pub sql: String,
    pub params: Vec<DbValue>,
}

pub(crate) fn check_table(table: &str) -> Result<(), StoreError> {
    if table.is_empty() {
        return Err(StoreError::ParameterError(
            "table name may not be empty".to_string(),
        ));
    }
    Ok(())
}

/// `"k1" = ? AND "k2" = ?` over the filter entries, or `None` when the map
/// is empty; zero-field filters degrade to the unfiltered statement.
pub(crate) fn conjunction(filter: &FieldMap) -> Option<String> {
    if filter.is_empty() {
        return None;
    }
    let clauses: Vec<String> = filter
        .iter()
        .map(|(column, _)| format!("{} = ?", quote_ident(column)))
        .collect();
    Some(clauses.join(" AND "))
}

pub(crate) fn order_fragment(order: Option<&OrderBy>) -> String {
    match order {
        Some(order) => format!(
            " ORDER BY {} {}",
            quote_ident(&order.column),
            order.direction.as_sql()
        ),
        None => String::new(),
    }
}
