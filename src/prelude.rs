//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::adapter::{SqlSrvAdapter, TransactionState, wrap_in_transaction};
pub use crate::config::{AdapterConfig, AdapterConfigBuilder};
pub use crate::driver::{DatabaseDriver, TableField};
pub use crate::error::AdapterError;
pub use crate::logging::{MemoryQueryLog, QueryLog, TracingQueryLog};
pub use crate::query::Query;
pub use crate::results::{BatchResult, CustomDbRow, Outcome, StatementOutcome};
pub use crate::translation::{
    LiteralAwareSplitter, StatementSplitter, escape, quote, replace_prefix, rewrite_limit,
    split_statements,
};
pub use crate::types::{CursorId, CursorKind, ErrorPolicy, FetchMode, RowValues};
pub use crate::vendor::{VendorClient, VendorConnection};

#[cfg(feature = "mssql")]
pub use crate::mssql::TiberiusClient;
