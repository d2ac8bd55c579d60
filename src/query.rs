use std::fmt;

/// SQL text plus the row window to return from it.
///
/// A `Query` is immutable once built; setting a new one on the adapter replaces the old.
///
/// ```rust
/// use mssql_adapter::prelude::*;
///
/// let query = Query::new("SELECT id, title FROM #__content ORDER BY id")
///     .with_limit(10)
///     .with_offset(20);
/// assert!(query.is_paginated());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    sql: String,
    limit: u64,
    offset: u64,
}

impl Query {
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            limit: 0,
            offset: 0,
        }
    }

    /// Maximum number of rows to return; 0 means unlimited.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Number of leading rows to skip.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether the statement has to be rewritten to honour limit/offset.
    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.limit > 0 || self.offset > 0
    }
}

impl From<&str> for Query {
    fn from(sql: &str) -> Self {
        Query::new(sql)
    }
}

impl From<String> for Query {
    fn from(sql: String) -> Self {
        Query::new(sql)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
