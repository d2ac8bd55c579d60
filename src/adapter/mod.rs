//! `SqlSrvAdapter`: the generic driver contract on top of a SQL Server client.
//!
//! Split across sub-modules:
//! - batch: multi-statement execution with abort/continue policies
//! - fetch: cursor reads and the `load_*` helpers built on them
//! - metadata: table listing, column descriptions, version and identity queries
//! - transaction: start/commit/rollback and the transaction state

mod batch;
mod fetch;
mod metadata;
mod transaction;

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde_json::{Map, Value as JsonValue};
use tracing::Level;

use crate::config::AdapterConfig;
use crate::driver::{DatabaseDriver, TableField};
use crate::error::AdapterError;
use crate::logging::{QueryLog, TracingQueryLog};
use crate::query::Query;
use crate::results::{BatchResult, CustomDbRow, FetchedRow};
use crate::translation::{self, LiteralAwareSplitter, StatementSplitter, rewrite_limit};
use crate::types::{CursorId, CursorKind, DATETIME_FORMAT, ErrorPolicy, FetchMode, RowValues};
use crate::vendor::{EngineError, ExecOptions, VendorClient, VendorConnection};

pub use batch::{BEGIN_TRANSACTION, COMMIT_TRANSACTION, wrap_in_transaction};
pub use transaction::TransactionState;

/// Zero value SQL Server uses for dates.
pub const NULL_DATE: &str = "1900-01-01 00:00:00";

type CursorOf<C> = <<C as VendorClient>::Connection as VendorConnection>::Cursor;

struct LiveCursor<K> {
    id: CursorId,
    sql: String,
    inner: K,
}

/// SQL Server implementation of [`DatabaseDriver`].
///
/// One adapter owns one connection and at most one live cursor. Every call blocks until the
/// server answers; share an adapter between threads only behind a lock.
///
/// ```rust,no_run
/// # #[cfg(feature = "mssql")]
/// # fn demo() -> Result<(), mssql_adapter::AdapterError> {
/// use mssql_adapter::prelude::*;
///
/// let config = AdapterConfig::builder().user("sa").password("secret").database("site").finish();
/// let mut db = SqlSrvAdapter::open(TiberiusClient::new(), config)?;
/// db.set_query(Query::new("SELECT id, title FROM #__content").with_limit(10));
/// db.query()?;
/// while let Some(row) = db.fetch_assoc(None)? {
///     println!("{:?}", row.get("title"));
/// }
/// # Ok(())
/// # }
/// ```
pub struct SqlSrvAdapter<C: VendorClient> {
    client: C,
    config: AdapterConfig,
    connection: Option<C::Connection>,
    cursor: Option<LiveCursor<CursorOf<C>>>,
    next_cursor: u64,
    sql: Query,
    transaction: TransactionState,
    splitter: Box<dyn StatementSplitter>,
    log: Box<dyn QueryLog>,
    count: u64,
    last_error: Option<EngineError>,
}

impl<C: VendorClient> SqlSrvAdapter<C> {
    /// Create an adapter without connecting.
    #[must_use]
    pub fn new(client: C, config: AdapterConfig) -> Self {
        Self {
            client,
            config,
            connection: None,
            cursor: None,
            next_cursor: 0,
            sql: Query::default(),
            transaction: TransactionState::None,
            splitter: Box::new(LiteralAwareSplitter),
            log: Box::new(TracingQueryLog),
            count: 0,
            last_error: None,
        }
    }

    /// Create an adapter and connect it.
    ///
    /// # Errors
    ///
    /// Returns the error of [`DatabaseDriver::connect`].
    pub fn open(client: C, config: AdapterConfig) -> Result<Self, AdapterError> {
        let mut adapter = Self::new(client, config);
        adapter.connect()?;
        Ok(adapter)
    }

    /// Use a different statement splitter for batches.
    #[must_use]
    pub fn with_splitter(mut self, splitter: impl StatementSplitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    /// Send executed statements and failures to `log` instead of `tracing`.
    #[must_use]
    pub fn with_query_log(mut self, log: impl QueryLog + 'static) -> Self {
        self.log = Box::new(log);
        self
    }

    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Statements executed while debug mode was on.
    #[must_use]
    pub fn query_count(&self) -> u64 {
        self.count
    }

    /// Error of the last statement, cleared when the next one starts. After a batch this is
    /// the last failure the batch recorded.
    #[must_use]
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// All diagnostics the client kept for the last failure.
    #[must_use]
    pub fn last_errors(&self) -> Vec<EngineError> {
        self.connection
            .as_ref()
            .map(|connection| connection.last_errors())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn transaction_state(&self) -> TransactionState {
        self.transaction
    }

    #[must_use]
    pub fn null_date(&self) -> &'static str {
        NULL_DATE
    }

    #[must_use]
    pub fn collation(&self) -> &'static str {
        "MSSQL UTF-8 (UCS2)"
    }

    #[must_use]
    pub fn has_utf(&self) -> bool {
        true
    }

    /// Render a timestamp the way the server parses `datetime` literals.
    #[must_use]
    pub fn date_to_string(&self, date: &NaiveDateTime) -> String {
        date.format(DATETIME_FORMAT).to_string()
    }

    /// Substitute the configured table prefix for its placeholder.
    #[must_use]
    pub fn replace_prefix<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        translation::replace_prefix(sql, &self.config.prefix_placeholder, &self.config.prefix)
    }

    /// The statement [`query`](DatabaseDriver::query) would send for the current query.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` when pagination cannot be applied.
    pub fn prepared_sql(&self) -> Result<String, AdapterError> {
        let sql = self.replace_prefix(self.sql.sql());
        if self.sql.is_paginated() {
            rewrite_limit(&sql, self.sql.limit(), self.sql.offset())
        } else {
            Ok(sql.into_owned())
        }
    }

    /// Execute one statement and make its cursor the live one.
    pub(crate) fn run(&mut self, sql: &str, kind: CursorKind) -> Result<CursorId, AdapterError> {
        let Some(connection) = self.connection.as_mut() else {
            return Err(AdapterError::not_connected(sql));
        };

        if self.config.debug {
            self.count += 1;
            self.log.record(sql, Level::DEBUG);
        }

        self.last_error = None;
        if let Some(previous) = self.cursor.take() {
            connection.free_cursor(previous.inner);
        }

        match connection.execute(sql, ExecOptions::new(kind)) {
            Ok(inner) => {
                self.next_cursor += 1;
                let id = CursorId(self.next_cursor);
                self.cursor = Some(LiveCursor {
                    id,
                    sql: sql.to_string(),
                    inner,
                });
                Ok(id)
            }
            Err(error) => {
                self.log.failure(&error, sql);
                self.last_error = Some(error.clone());
                Err(AdapterError::execution(error, sql))
            }
        }
    }

    fn live_cursor(
        &self,
        cursor: Option<CursorId>,
    ) -> Result<(&C::Connection, &LiveCursor<CursorOf<C>>), AdapterError> {
        let connection = self
            .connection
            .as_ref()
            .ok_or_else(|| AdapterError::InvalidCursor("connection is not open".to_string()))?;
        let live = self
            .cursor
            .as_ref()
            .ok_or_else(|| AdapterError::InvalidCursor("no live cursor".to_string()))?;
        check_handle(live.id, cursor)?;
        Ok((connection, live))
    }

    fn live_cursor_mut(
        &mut self,
        cursor: Option<CursorId>,
    ) -> Result<(&mut C::Connection, &mut LiveCursor<CursorOf<C>>), AdapterError> {
        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| AdapterError::InvalidCursor("connection is not open".to_string()))?;
        let live = self
            .cursor
            .as_mut()
            .ok_or_else(|| AdapterError::InvalidCursor("no live cursor".to_string()))?;
        check_handle(live.id, cursor)?;
        Ok((connection, live))
    }
}

fn check_handle(live: CursorId, requested: Option<CursorId>) -> Result<(), AdapterError> {
    match requested {
        Some(id) if id != live => Err(AdapterError::InvalidCursor(format!(
            "cursor {id} is no longer live; the live cursor is {live}"
        ))),
        _ => Ok(()),
    }
}

fn unexpected_shape(got: &FetchedRow, wanted: FetchMode) -> AdapterError {
    AdapterError::InvalidCursor(format!(
        "client returned a {:?} row for a {wanted:?} fetch",
        got.mode()
    ))
}

impl<C: VendorClient> DatabaseDriver for SqlSrvAdapter<C> {
    fn name(&self) -> &'static str {
        "sqlsrv"
    }

    fn connect(&mut self) -> Result<(), AdapterError> {
        if !self.client.is_available() {
            return Err(AdapterError::AdapterUnavailable(
                "the SQL Server client is not available in this build".to_string(),
            ));
        }

        self.disconnect();
        let connection = self
            .client
            .connect(
                &self.config.host,
                &self.config.credentials(),
                &self.config.connect_options(),
            )
            .map_err(|e| {
                AdapterError::ConnectionFailure(format!(
                    "could not connect to {}: {e}",
                    self.config.host
                ))
            })?;
        self.connection = Some(connection);
        tracing::debug!(host = %self.config.host, "connected to SQL Server");

        if self.config.auto_select && !self.config.database.is_empty() {
            let database = self.config.database.clone();
            self.select(&database)?;
        }
        Ok(())
    }

    fn connected(&self) -> bool {
        self.connection.is_some()
    }

    fn disconnect(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            if let Some(live) = self.cursor.take() {
                connection.free_cursor(live.inner);
            }
            tracing::debug!(host = %self.config.host, "disconnected from SQL Server");
        }
        self.cursor = None;
        self.transaction = TransactionState::None;
    }

    fn select(&mut self, database: &str) -> Result<bool, AdapterError> {
        if database.is_empty() {
            return Ok(false);
        }

        match self.run(&format!("USE {database}"), CursorKind::Static) {
            Ok(_) => Ok(true),
            Err(AdapterError::ExecutionFailure { message, .. }) => {
                Err(AdapterError::DatabaseSelectFailure {
                    database: database.to_string(),
                    message,
                })
            }
            Err(other) => Err(other),
        }
    }

    fn set_query(&mut self, query: Query) {
        self.sql = query;
    }

    fn current_query(&self) -> &Query {
        &self.sql
    }

    fn query(&mut self) -> Result<CursorId, AdapterError> {
        if self.connection.is_none() {
            return Err(AdapterError::not_connected(self.sql.sql()));
        }
        let sql = self.prepared_sql()?;
        self.run(&sql, CursorKind::for_statement(&sql))
    }

    fn execute_batch(
        &mut self,
        sql: &str,
        policy: ErrorPolicy,
        transaction_safe: bool,
    ) -> Result<BatchResult, AdapterError> {
        self.run_batch(sql, policy, transaction_safe)
    }

    fn affected_rows(&self) -> Result<u64, AdapterError> {
        let (connection, live) = self.live_cursor(None)?;
        Ok(connection.rows_affected(&live.inner))
    }

    fn num_rows(&self, cursor: Option<CursorId>) -> Result<u64, AdapterError> {
        let (connection, live) = self.live_cursor(cursor)?;
        connection.num_rows(&live.inner).ok_or_else(|| {
            AdapterError::InvalidCursor(
                "a forward-only cursor cannot report its number of rows".to_string(),
            )
        })
    }

    fn fetch_array(
        &mut self,
        cursor: Option<CursorId>,
    ) -> Result<Option<Vec<RowValues>>, AdapterError> {
        match self.fetch_shaped(cursor, FetchMode::Numeric)? {
            Some(FetchedRow::Numeric(values)) => Ok(Some(values)),
            Some(other) => Err(unexpected_shape(&other, FetchMode::Numeric)),
            None => Ok(None),
        }
    }

    fn fetch_assoc(&mut self, cursor: Option<CursorId>) -> Result<Option<CustomDbRow>, AdapterError> {
        match self.fetch_shaped(cursor, FetchMode::Associative)? {
            Some(FetchedRow::Associative(row)) => Ok(Some(row)),
            Some(other) => Err(unexpected_shape(&other, FetchMode::Associative)),
            None => Ok(None),
        }
    }

    fn fetch_object(
        &mut self,
        cursor: Option<CursorId>,
    ) -> Result<Option<Map<String, JsonValue>>, AdapterError> {
        match self.fetch_shaped(cursor, FetchMode::Object)? {
            Some(FetchedRow::Object(object)) => Ok(Some(object)),
            Some(other) => Err(unexpected_shape(&other, FetchMode::Object)),
            None => Ok(None),
        }
    }

    fn free_result(&mut self, cursor: Option<CursorId>) -> Result<(), AdapterError> {
        match (&self.cursor, cursor) {
            (Some(live), requested) => check_handle(live.id, requested)?,
            (None, Some(id)) => {
                return Err(AdapterError::InvalidCursor(format!(
                    "cursor {id} is no longer live"
                )));
            }
            (None, None) => return Ok(()),
        }

        if let (Some(connection), Some(live)) = (self.connection.as_mut(), self.cursor.take()) {
            connection.free_cursor(live.inner);
        }
        Ok(())
    }

    fn escape(&self, text: &str, extra: bool) -> String {
        translation::escape(text, extra)
    }

    fn transaction_start(&mut self) -> Result<(), AdapterError> {
        self.begin_transaction()
    }

    fn transaction_commit(&mut self) -> Result<(), AdapterError> {
        self.finish_transaction(COMMIT_TRANSACTION)
    }

    fn transaction_rollback(&mut self) -> Result<(), AdapterError> {
        self.finish_transaction(transaction::ROLLBACK_TRANSACTION)
    }

    fn table_list(&mut self) -> Result<Vec<String>, AdapterError> {
        self.list_tables()
    }

    fn table_fields(
        &mut self,
        tables: &[&str],
        type_only: bool,
    ) -> Result<BTreeMap<String, Vec<TableField>>, AdapterError> {
        self.describe_tables(tables, type_only)
    }

    fn table_create(&mut self, tables: &[&str]) -> Result<Vec<String>, AdapterError> {
        tracing::debug!(
            tables = tables.len(),
            "SQL Server cannot show CREATE TABLE statements; returning none"
        );
        Ok(Vec::new())
    }

    fn version(&mut self) -> Result<String, AdapterError> {
        self.server_version()
    }

    fn insert_id(&mut self) -> Result<i64, AdapterError> {
        self.last_identity()
    }
}
