use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use crate::error::AdapterError;
use crate::query::Query;
use crate::results::{BatchResult, CustomDbRow};
use crate::types::{CursorId, ErrorPolicy, RowValues};

/// Column description returned by [`DatabaseDriver::table_fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableField {
    pub field: String,
    /// Data type; digits and parentheses are stripped when only types were requested.
    pub data_type: String,
    /// `YES`/`NO`, absent when only types were requested.
    pub null: Option<String>,
    /// Column default expression, absent when only types were requested or none exists.
    pub default: Option<String>,
}

/// The engine-agnostic driver contract.
///
/// Cursor arguments default to the live cursor when `None`; passing a handle that is no
/// longer live is an `AdapterError::InvalidCursor`.
pub trait DatabaseDriver {
    /// Short driver name.
    fn name(&self) -> &'static str;

    /// Open the connection and, when configured, select the database.
    ///
    /// # Errors
    ///
    /// `AdapterUnavailable`, `ConnectionFailure` or `DatabaseSelectFailure`.
    fn connect(&mut self) -> Result<(), AdapterError>;

    fn connected(&self) -> bool;

    /// Drop the live cursor and the connection.
    fn disconnect(&mut self);

    /// Switch the session to `database`. Returns `Ok(false)` for an empty name.
    ///
    /// # Errors
    ///
    /// `DatabaseSelectFailure` when the server rejects the switch.
    fn select(&mut self, database: &str) -> Result<bool, AdapterError>;

    /// Replace the current query.
    fn set_query(&mut self, query: Query);

    fn current_query(&self) -> &Query;

    /// Execute the current query and make its cursor the live one.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` (also when not connected) or `InvalidQuery` if pagination cannot be
    /// applied.
    fn query(&mut self) -> Result<CursorId, AdapterError>;

    /// Split `sql` into statements and run them in order.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` when not connected; `Transaction` when `transaction_safe` is set
    /// while a transaction is active. Statement failures are reported in the [`BatchResult`]
    /// instead.
    fn execute_batch(
        &mut self,
        sql: &str,
        policy: ErrorPolicy,
        transaction_safe: bool,
    ) -> Result<BatchResult, AdapterError>;

    /// Rows affected by the statement behind the live cursor.
    ///
    /// # Errors
    ///
    /// `InvalidCursor` when there is no live cursor.
    fn affected_rows(&self) -> Result<u64, AdapterError>;

    /// Rows in the result set of `cursor`.
    ///
    /// # Errors
    ///
    /// `InvalidCursor` for stale handles or cursors that cannot count their rows.
    fn num_rows(&self, cursor: Option<CursorId>) -> Result<u64, AdapterError>;

    /// # Errors
    ///
    /// `InvalidCursor` for stale handles; `ExecutionFailure` when reading the row fails.
    fn fetch_array(&mut self, cursor: Option<CursorId>)
    -> Result<Option<Vec<RowValues>>, AdapterError>;

    /// # Errors
    ///
    /// `InvalidCursor` for stale handles; `ExecutionFailure` when reading the row fails.
    fn fetch_assoc(&mut self, cursor: Option<CursorId>) -> Result<Option<CustomDbRow>, AdapterError>;

    /// # Errors
    ///
    /// `InvalidCursor` for stale handles; `ExecutionFailure` when reading the row fails.
    fn fetch_object(
        &mut self,
        cursor: Option<CursorId>,
    ) -> Result<Option<Map<String, JsonValue>>, AdapterError>;

    /// Release the cursor.
    ///
    /// # Errors
    ///
    /// `InvalidCursor` for stale handles.
    fn free_result(&mut self, cursor: Option<CursorId>) -> Result<(), AdapterError>;

    /// Escape text for a string literal; `extra` also escapes the `_` wildcard.
    fn escape(&self, text: &str, extra: bool) -> String;

    /// Escape text and wrap it in quotes.
    fn quote(&self, text: &str) -> String {
        format!("'{}'", self.escape(text, false))
    }

    /// # Errors
    ///
    /// `Transaction` when one is already active, `ExecutionFailure` if the statement fails.
    fn transaction_start(&mut self) -> Result<(), AdapterError>;

    /// # Errors
    ///
    /// `Transaction` when none is active, `ExecutionFailure` if the statement fails.
    fn transaction_commit(&mut self) -> Result<(), AdapterError>;

    /// # Errors
    ///
    /// `Transaction` when none is active, `ExecutionFailure` if the statement fails.
    fn transaction_rollback(&mut self) -> Result<(), AdapterError>;

    /// Names of the user tables.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` if the listing query fails.
    fn table_list(&mut self) -> Result<Vec<String>, AdapterError>;

    /// Columns of each table.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` if a metadata query fails.
    fn table_fields(
        &mut self,
        tables: &[&str],
        type_only: bool,
    ) -> Result<BTreeMap<String, Vec<TableField>>, AdapterError>;

    /// `CREATE TABLE` statements for the tables, where the dialect can produce them.
    ///
    /// # Errors
    ///
    /// Implementations that cannot produce them return an empty list, not an error.
    fn table_create(&mut self, tables: &[&str]) -> Result<Vec<String>, AdapterError>;

    /// Server version string.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` if the version query fails.
    fn version(&mut self) -> Result<String, AdapterError>;

    /// Identity value generated by the last insert on this connection.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` if the identity query fails.
    fn insert_id(&mut self) -> Result<i64, AdapterError>;
}
