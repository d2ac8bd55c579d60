use super::SqlSrvAdapter;
use crate::error::AdapterError;
use crate::types::CursorKind;
use crate::vendor::VendorClient;

pub(super) const ROLLBACK_TRANSACTION: &str = "ROLLBACK TRANSACTION";

/// Whether the adapter opened a transaction that is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    #[default]
    None,
    Active,
}

impl<C: VendorClient> SqlSrvAdapter<C> {
    pub(super) fn begin_transaction(&mut self) -> Result<(), AdapterError> {
        if self.transaction == TransactionState::Active {
            return Err(AdapterError::Transaction(
                "a transaction is already active; nested transactions are not supported".to_string(),
            ));
        }
        self.run(super::BEGIN_TRANSACTION, CursorKind::Static)?;
        self.transaction = TransactionState::Active;
        Ok(())
    }

    /// Commit or roll back. The state stays `Active` when the statement fails.
    pub(super) fn finish_transaction(&mut self, statement: &str) -> Result<(), AdapterError> {
        if self.transaction == TransactionState::None {
            return Err(AdapterError::Transaction(format!(
                "no active transaction for {statement}"
            )));
        }
        self.run(statement, CursorKind::Static)?;
        self.transaction = TransactionState::None;
        Ok(())
    }
}
