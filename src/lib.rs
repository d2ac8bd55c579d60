#![doc = r#"
SQL Server driver adapter.

`SqlSrvAdapter` implements the engine-agnostic [`DatabaseDriver`] contract on top of a blocking
vendor client. Besides plain statement execution it:

- rewrites limit/offset requests into `ROW_NUMBER()` windows, since the dialect has no
  `LIMIT`/`OFFSET`;
- splits multi-statement batches on `;` without tripping over literals, quoted identifiers
  or comments, and runs them with an abort or continue policy;
- replaces the `#__` table prefix placeholder and escapes text for literals.

The tiberius-backed client lives behind the `mssql` feature (on by default). The
`test-utils` feature exposes a scripted client for tests that need no server.

```rust
use mssql_adapter::prelude::*;

let sql = rewrite_limit("SELECT id FROM t ORDER BY id", 10, 20)?;
assert_eq!(
    sql,
    "SELECT TOP 10 * FROM (SELECT id, ROW_NUMBER() OVER (ORDER BY id) AS RowNumber FROM t) \
     _myResults WHERE RowNumber > 20"
);
# Ok::<(), AdapterError>(())
```
"#]

pub mod adapter;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod query;
pub mod results;
pub mod translation;
pub mod types;
pub mod vendor;

#[cfg(feature = "mssql")]
pub mod mssql;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapter::{SqlSrvAdapter, TransactionState, wrap_in_transaction};
pub use config::{AdapterConfig, AdapterConfigBuilder};
pub use driver::{DatabaseDriver, TableField};
pub use error::AdapterError;
pub use query::Query;
pub use results::{BatchResult, CustomDbRow, Outcome, StatementOutcome};
pub use types::{CursorId, CursorKind, ErrorPolicy, FetchMode, RowValues};
