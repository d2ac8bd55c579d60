use std::collections::BTreeMap;

use super::SqlSrvAdapter;
use crate::driver::DatabaseDriver;
use crate::error::AdapterError;
use crate::results::{CustomDbRow, FetchedRow};
use crate::types::{CursorId, FetchMode, RowValues};
use crate::vendor::{VendorClient, VendorConnection};

impl<C: VendorClient> SqlSrvAdapter<C> {
    pub(super) fn fetch_shaped(
        &mut self,
        cursor: Option<CursorId>,
        mode: FetchMode,
    ) -> Result<Option<FetchedRow>, AdapterError> {
        let (connection, live) = self.live_cursor_mut(cursor)?;
        match connection.fetch_row(&mut live.inner, mode) {
            Ok(row) => Ok(row),
            Err(error) => {
                let sql = live.sql.clone();
                self.log.failure(&error, &sql);
                self.last_error = Some(error.clone());
                Err(AdapterError::execution(error, &sql))
            }
        }
    }

    /// Run the current query and return the first column of its first row.
    ///
    /// # Errors
    ///
    /// Errors of [`query`](DatabaseDriver::query) and of the fetch.
    pub fn load_result(&mut self) -> Result<Option<RowValues>, AdapterError> {
        let cursor = self.query()?;
        let value = self
            .fetch_array(Some(cursor))?
            .and_then(|row| row.into_iter().next());
        self.free_result(Some(cursor))?;
        Ok(value)
    }

    /// Run the current query and return the first column of every row.
    ///
    /// # Errors
    ///
    /// Errors of [`query`](DatabaseDriver::query) and of the fetch.
    pub fn load_column(&mut self) -> Result<Vec<RowValues>, AdapterError> {
        let cursor = self.query()?;
        let mut column = Vec::new();
        while let Some(row) = self.fetch_array(Some(cursor))? {
            if let Some(value) = row.into_iter().next() {
                column.push(value);
            }
        }
        self.free_result(Some(cursor))?;
        Ok(column)
    }

    /// Run the current query and return every row keyed by column name.
    ///
    /// # Errors
    ///
    /// Errors of [`query`](DatabaseDriver::query) and of the fetch.
    pub fn load_assoc_list(&mut self) -> Result<Vec<CustomDbRow>, AdapterError> {
        let cursor = self.query()?;
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_assoc(Some(cursor))? {
            rows.push(row);
        }
        self.free_result(Some(cursor))?;
        Ok(rows)
    }

    /// Like [`load_assoc_list`](Self::load_assoc_list), keyed by the text of column `key`.
    ///
    /// Rows whose key is NULL are skipped; a later row with the same key replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Errors of [`query`](DatabaseDriver::query) and of the fetch.
    pub fn load_assoc_map(&mut self, key: &str) -> Result<BTreeMap<String, CustomDbRow>, AdapterError> {
        let mut keyed = BTreeMap::new();
        for row in self.load_assoc_list()? {
            if let Some(k) = row.get(key).and_then(RowValues::to_text) {
                keyed.insert(k, row);
            }
        }
        Ok(keyed)
    }
}
