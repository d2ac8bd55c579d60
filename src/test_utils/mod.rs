//! Scripted in-memory vendor client for tests.
//!
//! Statements are matched against scripted fragments by substring; the first matching
//! failure wins over any matching response. Clones of a [`ScriptedClient`] share their script
//! and history, so one clone can go into the adapter while the test keeps the other.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::results::{BufferedCursor, FetchedRow};
use crate::types::{CursorKind, FetchMode, RowValues};
use crate::vendor::{
    ConnectOptions, Credentials, EngineError, ExecOptions, VendorClient, VendorConnection,
};

#[derive(Debug, Default)]
struct Script {
    failures: Vec<(String, EngineError)>,
    responses: Vec<(String, Vec<String>, Vec<Vec<RowValues>>)>,
    affected: Vec<(String, u64)>,
    executed: Vec<(String, CursorKind)>,
    connections: Vec<(String, ConnectOptions)>,
    freed: usize,
}

/// A [`VendorClient`] that answers from a script instead of a server.
#[derive(Debug, Clone)]
pub struct ScriptedClient {
    script: Arc<Mutex<Script>>,
    available: bool,
    refuse: bool,
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Arc::default(),
            available: true,
            refuse: false,
        }
    }

    /// A client that reports itself unavailable.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// A client whose every login is rejected.
    #[must_use]
    pub fn refusing_connections() -> Self {
        Self {
            refuse: true,
            ..Self::new()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail every statement containing `fragment`.
    #[must_use]
    pub fn fail_when(self, fragment: &str, code: &str, message: &str) -> Self {
        self.lock()
            .failures
            .push((fragment.to_string(), EngineError::new(code, message)));
        self
    }

    /// Answer statements containing `fragment` with a result set.
    #[must_use]
    pub fn respond(self, fragment: &str, columns: &[&str], rows: Vec<Vec<RowValues>>) -> Self {
        let columns = columns.iter().map(|c| (*c).to_string()).collect();
        self.lock()
            .responses
            .push((fragment.to_string(), columns, rows));
        self
    }

    /// Report `rows` affected rows for statements containing `fragment`.
    #[must_use]
    pub fn affect(self, fragment: &str, rows: u64) -> Self {
        self.lock().affected.push((fragment.to_string(), rows));
        self
    }

    /// Every statement executed so far, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.lock()
            .executed
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    /// Every statement executed so far with the cursor kind it was executed with.
    #[must_use]
    pub fn executed_with_kind(&self) -> Vec<(String, CursorKind)> {
        self.lock().executed.clone()
    }

    /// Host and options of every successful connect.
    #[must_use]
    pub fn connections(&self) -> Vec<(String, ConnectOptions)> {
        self.lock().connections.clone()
    }

    /// Number of cursors handed back to the client.
    #[must_use]
    pub fn freed_cursors(&self) -> usize {
        self.lock().freed
    }
}

impl VendorClient for ScriptedClient {
    type Connection = ScriptedConnection;

    fn is_available(&self) -> bool {
        self.available
    }

    fn connect(
        &self,
        host: &str,
        credentials: &Credentials,
        options: &ConnectOptions,
    ) -> Result<ScriptedConnection, EngineError> {
        if self.refuse {
            return Err(EngineError::new(
                "18456",
                format!("Login failed for user '{}'.", credentials.user),
            ));
        }
        self.lock()
            .connections
            .push((host.to_string(), options.clone()));
        Ok(ScriptedConnection {
            client: self.clone(),
            errors: Vec::new(),
        })
    }
}

/// Connection handed out by [`ScriptedClient`].
#[derive(Debug)]
pub struct ScriptedConnection {
    client: ScriptedClient,
    errors: Vec<EngineError>,
}

impl VendorConnection for ScriptedConnection {
    type Cursor = BufferedCursor;

    fn execute(&mut self, sql: &str, options: ExecOptions) -> Result<BufferedCursor, EngineError> {
        let mut script = self.client.lock();
        script.executed.push((sql.to_string(), options.cursor));
        self.errors.clear();

        if let Some((_, error)) = script.failures.iter().find(|(f, _)| sql.contains(f.as_str())) {
            self.errors.push(error.clone());
            return Err(error.clone());
        }

        let affected = script
            .affected
            .iter()
            .find(|(f, _)| sql.contains(f.as_str()))
            .map_or(0, |(_, rows)| *rows);

        let cursor = match script
            .responses
            .iter()
            .find(|(f, _, _)| sql.contains(f.as_str()))
        {
            Some((_, columns, rows)) => {
                BufferedCursor::new(options.cursor, columns.clone(), rows.clone())
            }
            None => BufferedCursor::empty(options.cursor),
        };
        Ok(cursor.with_rows_affected(affected))
    }

    fn fetch_row(
        &mut self,
        cursor: &mut BufferedCursor,
        mode: FetchMode,
    ) -> Result<Option<FetchedRow>, EngineError> {
        Ok(cursor.next_row(mode))
    }

    fn rows_affected(&self, cursor: &BufferedCursor) -> u64 {
        cursor.rows_affected()
    }

    fn num_rows(&self, cursor: &BufferedCursor) -> Option<u64> {
        cursor.num_rows()
    }

    fn free_cursor(&mut self, _cursor: BufferedCursor) {
        self.client.lock().freed += 1;
    }

    fn last_errors(&self) -> Vec<EngineError> {
        self.errors.clone()
    }
}
