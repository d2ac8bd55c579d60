//! Text-level SQL transforms for the SQL Server dialect.
//!
//! Everything here runs on raw SQL through a small byte scanner that knows about string
//! literals (`'...'`), quoted identifiers (`"..."`, `[...]`) and comments (`--`, nested
//! `/* */`). It is not a parser: constructs it does not model are passed through untouched.

mod escape;
mod keywords;
mod pagination;
mod parsers;
mod prefix;
mod scanner;
mod splitter;

pub use escape::{escape, quote};
pub(crate) use keywords::leading_word;
pub use pagination::{RESULTS_ALIAS, ROW_NUMBER_COLUMN, rewrite_limit};
pub use prefix::{DEFAULT_PREFIX_PLACEHOLDER, replace_prefix};
pub use splitter::{LiteralAwareSplitter, StatementSplitter, split_statements};
