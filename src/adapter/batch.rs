use super::{SqlSrvAdapter, TransactionState};
use crate::error::AdapterError;
use crate::results::BatchResult;
use crate::types::{CursorKind, ErrorPolicy};
use crate::vendor::{EngineError, VendorClient};

pub const BEGIN_TRANSACTION: &str = "BEGIN TRANSACTION";
pub const COMMIT_TRANSACTION: &str = "COMMIT TRANSACTION";

/// Rollback issued after an aborted transaction-safe batch; harmless if the server already
/// rolled back.
const ROLLBACK_IF_OPEN: &str = "IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION";

/// Wrap a batch so it runs as one transaction.
///
/// ```rust
/// use mssql_adapter::wrap_in_transaction;
///
/// assert_eq!(
///     wrap_in_transaction("UPDATE a SET x = 1"),
///     "BEGIN TRANSACTION;UPDATE a SET x = 1; COMMIT TRANSACTION;"
/// );
/// ```
#[must_use]
pub fn wrap_in_transaction(sql: &str) -> String {
    format!("{BEGIN_TRANSACTION};{sql}; {COMMIT_TRANSACTION};")
}

impl<C: VendorClient> SqlSrvAdapter<C> {
    pub(super) fn run_batch(
        &mut self,
        sql: &str,
        policy: ErrorPolicy,
        transaction_safe: bool,
    ) -> Result<BatchResult, AdapterError> {
        if self.connection.is_none() {
            return Err(AdapterError::not_connected(sql));
        }
        if transaction_safe && self.transaction == TransactionState::Active {
            return Err(AdapterError::Transaction(
                "a transaction-safe batch cannot run inside an active transaction".to_string(),
            ));
        }

        let sql = self.replace_prefix(sql).into_owned();
        let sql = if transaction_safe {
            wrap_in_transaction(&sql)
        } else {
            sql
        };
        let statements = self.splitter.split(&sql);
        let mut result = BatchResult::with_capacity(statements.len());

        for statement in statements {
            let kind = CursorKind::for_statement(&statement);
            match self.run(&statement, kind) {
                Ok(cursor) => result.push_success(statement, cursor),
                Err(AdapterError::ExecutionFailure { code, message, .. }) => {
                    result.push_failure(statement, code, message);
                    if policy == ErrorPolicy::Abort {
                        if transaction_safe {
                            self.rollback_aborted_batch();
                        }
                        break;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        if let Some((code, message)) = result.last_error() {
            self.last_error = Some(EngineError::new(code, message));
            tracing::warn!(
                statements = result.len(),
                failures = result.failures(),
                ?policy,
                "batch finished with failures"
            );
        }
        Ok(result)
    }

    fn rollback_aborted_batch(&mut self) {
        if let Err(e) = self.run(ROLLBACK_IF_OPEN, CursorKind::Static) {
            tracing::warn!(error = %e, "rollback after aborted batch failed");
        }
    }

    /// Run the current query as a batch, using the configured error policy.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` when not connected, `Transaction` for a transaction-safe batch
    /// inside an active transaction.
    pub fn query_batch(&mut self, transaction_safe: bool) -> Result<BatchResult, AdapterError> {
        let sql = self.sql.sql().to_string();
        let policy = self.config.error_policy;
        self.run_batch(&sql, policy, transaction_safe)
    }
}
