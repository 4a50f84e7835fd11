use std::collections::HashMap;
use std::sync::Arc;

use crate::fields::FieldMap;
use crate::types::DbValue;

/// A single untyped row.
///
/// Column names are shared across all rows of a result set; a name → index
/// cache avoids repeated string comparisons on hot lookup paths.
#[derive(Debug, Clone)]
pub struct Record {
    /// The column names for this row (shared across the result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<DbValue>,
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl Record {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<DbValue>) -> Self {
        let cache = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );

        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    /// Index of a column by name, if present.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Value of a column by name, if present.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&DbValue> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value of a column by index, if in bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&DbValue> {
        self.values.get(index)
    }

    /// The generated `id` column, for ID-keyed tables.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(|v| v.as_int()).copied()
    }

    /// Copy this row out into an owned field map.
    #[must_use]
    pub fn to_field_map(&self) -> FieldMap {
        self.column_names
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}
