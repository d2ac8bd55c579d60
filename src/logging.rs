use std::sync::{Arc, Mutex, MutexGuard};

use tracing::Level;

use crate::vendor::EngineError;

/// `tracing` target executed statements are logged under.
pub const QUERY_TARGET: &str = "databasequery";

/// Sink for executed SQL and statement failures.
///
/// The adapter hands every executed statement to [`record`](QueryLog::record) while debug mode
/// is on, and every failure to [`failure`](QueryLog::failure) regardless of debug mode.
pub trait QueryLog: Send {
    fn record(&mut self, sql: &str, level: Level);

    fn failure(&mut self, error: &EngineError, sql: &str);
}

/// Default sink: emits `tracing` events under the [`QUERY_TARGET`] target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingQueryLog;

impl QueryLog for TracingQueryLog {
    fn record(&mut self, sql: &str, level: Level) {
        match level {
            Level::ERROR => tracing::error!(target: QUERY_TARGET, sql),
            Level::WARN => tracing::warn!(target: QUERY_TARGET, sql),
            Level::INFO => tracing::info!(target: QUERY_TARGET, sql),
            Level::DEBUG => tracing::debug!(target: QUERY_TARGET, sql),
            _ => tracing::trace!(target: QUERY_TARGET, sql),
        }
    }

    fn failure(&mut self, error: &EngineError, sql: &str) {
        tracing::error!(
            target: QUERY_TARGET,
            code = %error.code,
            message = %error.message,
            sql,
            "query failed"
        );
    }
}

/// One entry of a [`MemoryQueryLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Statement { sql: String, level: Level },
    Failure { code: String, message: String, sql: String },
}

/// Sink that keeps every entry in memory.
///
/// Clones share the same buffer, so one clone can be handed to the adapter and another kept
/// to read the log back.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueryLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryQueryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // a poisoned log is still a readable log
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Text of every recorded statement, in execution order.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Statement { sql, .. } => Some(sql.clone()),
                LogEntry::Failure { .. } => None,
            })
            .collect()
    }

    /// `(code, message)` of every recorded failure.
    #[must_use]
    pub fn failures(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Failure { code, message, .. } => Some((code.clone(), message.clone())),
                LogEntry::Statement { .. } => None,
            })
            .collect()
    }
}

impl QueryLog for MemoryQueryLog {
    fn record(&mut self, sql: &str, level: Level) {
        self.lock().push(LogEntry::Statement {
            sql: sql.to_string(),
            level,
        });
    }

    fn failure(&mut self, error: &EngineError, sql: &str) {
        self.lock().push(LogEntry::Failure {
            code: error.code.clone(),
            message: error.message.clone(),
            sql: sql.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let log = MemoryQueryLog::new();
        let mut sink = log.clone();
        sink.record("SELECT 1", Level::DEBUG);
        sink.failure(&EngineError::new("208", "Invalid object name"), "SELECT * FROM nope");

        assert_eq!(log.statements(), vec!["SELECT 1".to_string()]);
        assert_eq!(
            log.failures(),
            vec![("208".to_string(), "Invalid object name".to_string())]
        );
        assert_eq!(log.entries().len(), 2);
    }
}
