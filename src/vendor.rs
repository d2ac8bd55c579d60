//! The vendor client capability the adapter drives.
//!
//! [`VendorClient`] opens connections; [`VendorConnection`] executes statements and walks
//! their cursors. The adapter never talks to the wire itself, so any client with this shape
//! can sit underneath it: the tiberius client behind the `mssql` feature, or a scripted one
//! in tests.

use std::fmt;

use crate::results::FetchedRow;
use crate::types::{CursorKind, FetchMode};

/// An error reported by the engine or the client for one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    /// Engine error code (SQLSTATE or native error number).
    pub code: String,
    pub message: String,
}

impl EngineError {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for EngineError {}

/// Login details handed to the vendor client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

/// Connection options handed to the vendor client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Database to open the session in; empty for the login's default.
    pub database: String,
    pub port: u16,
    pub instance_name: Option<String>,
    pub trust_cert: bool,
}

/// Per-statement execution options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    pub cursor: CursorKind,
}

impl ExecOptions {
    #[must_use]
    pub fn new(cursor: CursorKind) -> Self {
        Self { cursor }
    }
}

/// Opens connections to the engine.
pub trait VendorClient {
    type Connection: VendorConnection;

    /// Whether the client can be used at all in this process.
    fn is_available(&self) -> bool {
        true
    }

    /// Open a connection.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the server cannot be reached or rejects the login.
    fn connect(
        &self,
        host: &str,
        credentials: &Credentials,
        options: &ConnectOptions,
    ) -> Result<Self::Connection, EngineError>;
}

/// An open session: executes statements and owns the cursors it hands out.
pub trait VendorConnection {
    type Cursor;

    /// Execute one statement, blocking until the engine answers.
    ///
    /// # Errors
    ///
    /// Returns the first diagnostic the engine reported for the statement.
    fn execute(&mut self, sql: &str, options: ExecOptions) -> Result<Self::Cursor, EngineError>;

    /// Next row of `cursor` in the requested shape; `None` at the end of the results.
    ///
    /// # Errors
    ///
    /// Returns an engine error if reading the row fails.
    fn fetch_row(
        &mut self,
        cursor: &mut Self::Cursor,
        mode: FetchMode,
    ) -> Result<Option<FetchedRow>, EngineError>;

    fn rows_affected(&self, cursor: &Self::Cursor) -> u64;

    /// Rows in the cursor's result set; `None` when the cursor type cannot tell.
    fn num_rows(&self, cursor: &Self::Cursor) -> Option<u64>;

    fn free_cursor(&mut self, cursor: Self::Cursor);

    /// Diagnostics of the most recent failure on this connection.
    fn last_errors(&self) -> Vec<EngineError>;
}
