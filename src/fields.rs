use crate::error::StoreError;
use crate::types::DbValue;

/// An insertion-ordered column → value mapping.
///
/// Field maps describe both row shapes (INSERT / UPDATE set lists) and
/// equality filters (entries AND-ed together). Keys are dynamically typed on
/// purpose: the engine has no compiled knowledge of domain tables, so column
/// names are not checked until the database sees the statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, DbValue)>,
}

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace a field, keeping first-insertion order.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<DbValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<DbValue>) {
        let column = column.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&DbValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DbValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Values in insertion order, cloned into a parameter vector.
    #[must_use]
    pub fn values(&self) -> Vec<DbValue> {
        self.entries
            .iter()
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Reject maps the builder cannot turn into valid SQL.
    ///
    /// # Errors
    /// Returns `StoreError::ParameterError` if any key is the empty string.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.entries.iter().any(|(name, _)| name.is_empty()) {
            return Err(StoreError::ParameterError(
                "field map contains an empty column name".to_string(),
            ));
        }
        Ok(())
    }
}

impl<S: Into<String>, V: Into<DbValue>> FromIterator<(S, V)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        let mut map = FieldMap::new();
        for (column, value) in iter {
            map.insert(column, value);
        }
        map
    }
}

impl From<i64> for DbValue {
    fn from(value: i64) -> Self {
        DbValue::Int(value)
    }
}

impl From<f64> for DbValue {
    fn from(value: f64) -> Self {
        DbValue::Float(value)
    }
}

impl From<&str> for DbValue {
    fn from(value: &str) -> Self {
        DbValue::Text(value.to_string())
    }
}

impl From<String> for DbValue {
    fn from(value: String) -> Self {
        DbValue::Text(value)
    }
}

impl From<bool> for DbValue {
    fn from(value: bool) -> Self {
        DbValue::Bool(value)
    }
}

impl From<chrono::NaiveDateTime> for DbValue {
    fn from(value: chrono::NaiveDateTime) -> Self {
        DbValue::Timestamp(value)
    }
}

/// Sort direction for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Explicit ordering for list operations. Without one, result order is the
/// database's natural scan order, with no guarantee attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    #[must_use]
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Double-quote an identifier, doubling any embedded quote characters.
/// Works for both supported dialects.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for ch in name.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}
