use std::collections::VecDeque;
use std::sync::Arc;

use super::row::{ColumnIndex, CustomDbRow, FetchedRow, column_index};
use crate::types::{CursorKind, FetchMode, RowValues};

/// A result set held client-side and handed out one row at a time.
///
/// Both the tiberius client and the scripted test client buffer their results this way, so
/// the number of rows is known up front for keyset and static cursors.
#[derive(Debug, Clone)]
pub struct BufferedCursor {
    kind: CursorKind,
    column_names: Arc<Vec<String>>,
    index: ColumnIndex,
    rows: VecDeque<Vec<RowValues>>,
    total_rows: u64,
    rows_affected: u64,
}

impl BufferedCursor {
    #[must_use]
    pub fn new(kind: CursorKind, column_names: Vec<String>, rows: Vec<Vec<RowValues>>) -> Self {
        let index = column_index(&column_names);
        Self {
            kind,
            column_names: Arc::new(column_names),
            index,
            total_rows: rows.len() as u64,
            rows: rows.into(),
            rows_affected: 0,
        }
    }

    /// A cursor for a statement that returned no result set.
    #[must_use]
    pub fn empty(kind: CursorKind) -> Self {
        Self::new(kind, Vec::new(), Vec::new())
    }

    #[must_use]
    pub fn with_rows_affected(mut self, rows_affected: u64) -> Self {
        self.rows_affected = rows_affected;
        self
    }

    #[must_use]
    pub fn kind(&self) -> CursorKind {
        self.kind
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    /// Pop the next row, shaped for `mode`. `None` once the results are exhausted.
    pub fn next_row(&mut self, mode: FetchMode) -> Option<FetchedRow> {
        let values = self.rows.pop_front()?;
        let row = CustomDbRow::with_index(self.column_names.clone(), self.index.clone(), values);
        Some(FetchedRow::shape(row, mode))
    }

    /// Number of rows in the result set. Forward-only cursors cannot report it.
    #[must_use]
    pub fn num_rows(&self) -> Option<u64> {
        match self.kind {
            CursorKind::Forward => None,
            CursorKind::Keyset | CursorKind::Static => Some(self.total_rows),
        }
    }

    #[must_use]
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_rows_in_order() {
        let mut cursor = BufferedCursor::new(
            CursorKind::Keyset,
            vec!["n".into()],
            vec![vec![RowValues::Int(1)], vec![RowValues::Int(2)]],
        );
        assert_eq!(cursor.num_rows(), Some(2));

        let Some(FetchedRow::Associative(first)) = cursor.next_row(FetchMode::Associative) else {
            panic!("expected a row");
        };
        assert_eq!(first.get("n"), Some(&RowValues::Int(1)));
        assert!(cursor.next_row(FetchMode::Numeric).is_some());
        assert!(cursor.next_row(FetchMode::Numeric).is_none());
        // the count describes the result set, not what is left of it
        assert_eq!(cursor.num_rows(), Some(2));
    }

    #[test]
    fn forward_cursors_only_report_affected_rows() {
        let cursor = BufferedCursor::empty(CursorKind::Forward).with_rows_affected(3);
        assert_eq!(cursor.num_rows(), None);
        assert_eq!(cursor.rows_affected(), 3);
    }
}
