use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::types::{FetchMode, RowValues};

/// Column-name lookup table shared by every row of one result set.
pub type ColumnIndex = Arc<HashMap<String, usize>>;

/// Build the name-to-position table for a set of column names.
///
/// When a name repeats, the first position wins.
#[must_use]
pub fn column_index(column_names: &[String]) -> ColumnIndex {
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        index.entry(name.clone()).or_insert(i);
    }
    Arc::new(index)
}

/// A row from a database query result
///
/// This struct represents a single row from a database query result,
/// with access to both the column names and the values.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    // Internal cache for faster column lookups (to avoid repeated string comparisons)
    #[doc(hidden)]
    pub(crate) column_index_cache: ColumnIndex,
}

impl CustomDbRow {
    /// Create a new database row, building its own column lookup table.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let cache = column_index(&column_names);
        Self::with_index(column_names, cache, rows)
    }

    /// Create a row that reuses a lookup table built once for its result set.
    #[must_use]
    pub fn with_index(
        column_names: Arc<Vec<String>>,
        column_index_cache: ColumnIndex,
        rows: Vec<RowValues>,
    ) -> Self {
        Self {
            column_names,
            rows,
            column_index_cache,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }

        // Fall back to a case-insensitive search; SQL Server column names are usually
        // case-insensitive.
        self.column_names
            .iter()
            .position(|col| col.eq_ignore_ascii_case(column_name))
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    /// Render the row as a JSON object keyed by column name.
    #[must_use]
    pub fn to_object(&self) -> Map<String, JsonValue> {
        self.column_names
            .iter()
            .zip(&self.rows)
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}

/// A fetched row in the shape the caller asked for.
#[derive(Debug, Clone)]
pub enum FetchedRow {
    Numeric(Vec<RowValues>),
    Associative(CustomDbRow),
    Object(Map<String, JsonValue>),
}

impl FetchedRow {
    /// Shape a row for the given fetch mode.
    #[must_use]
    pub fn shape(row: CustomDbRow, mode: FetchMode) -> Self {
        match mode {
            FetchMode::Numeric => FetchedRow::Numeric(row.rows),
            FetchMode::Associative => FetchedRow::Associative(row),
            FetchMode::Object => FetchedRow::Object(row.to_object()),
        }
    }

    /// The mode this row was shaped for.
    #[must_use]
    pub fn mode(&self) -> FetchMode {
        match self {
            FetchedRow::Numeric(_) => FetchMode::Numeric,
            FetchedRow::Associative(_) => FetchMode::Associative,
            FetchedRow::Object(_) => FetchMode::Object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CustomDbRow {
        CustomDbRow::new(
            Arc::new(vec!["Field".into(), "Type".into()]),
            vec![RowValues::Text("id".into()), RowValues::Text("int".into())],
        )
    }

    #[test]
    fn looks_up_columns_ignoring_case() {
        let row = sample();
        assert_eq!(row.get("Field"), Some(&RowValues::Text("id".into())));
        assert_eq!(row.get("type"), Some(&RowValues::Text("int".into())));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn shapes_rows_by_mode() {
        let FetchedRow::Numeric(values) = FetchedRow::shape(sample(), FetchMode::Numeric) else {
            panic!("expected a numeric row");
        };
        assert_eq!(values.len(), 2);

        let FetchedRow::Object(object) = FetchedRow::shape(sample(), FetchMode::Object) else {
            panic!("expected an object row");
        };
        assert_eq!(object.get("Type"), Some(&JsonValue::String("int".into())));
    }
}
