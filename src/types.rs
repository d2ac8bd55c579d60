use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};

use crate::translation::leading_word;

/// Format SQL Server accepts for `datetime` literals; also used when rows are rendered as JSON.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Values that can be stored in a database row.
///
/// ```rust
/// use mssql_adapter::prelude::*;
///
/// let row = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = row;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    /// Lossy integer view used for identity values, which SQL Server reports as `numeric(38,0)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_i64_lossy(&self) -> Option<i64> {
        match self {
            RowValues::Int(i) => Some(*i),
            RowValues::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            RowValues::Text(s) => s.trim().parse().ok(),
            RowValues::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Render the value as text, the way result sets are shown when dates come back as strings.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            RowValues::Int(i) => Some(i.to_string()),
            RowValues::Float(f) => Some(f.to_string()),
            RowValues::Text(s) => Some(s.clone()),
            RowValues::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            RowValues::Timestamp(dt) => Some(dt.format(DATETIME_FORMAT).to_string()),
            RowValues::JSON(js) => Some(js.to_string()),
            RowValues::Null | RowValues::Blob(_) => None,
        }
    }

    /// Convert into a JSON value for object-shaped row fetches.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::Number((*i).into()),
            RowValues::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            RowValues::Text(s) => JsonValue::String(s.clone()),
            RowValues::Bool(b) => JsonValue::Bool(*b),
            RowValues::Timestamp(dt) => JsonValue::String(dt.format(DATETIME_FORMAT).to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(js) => js.clone(),
            RowValues::Blob(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::Number((*b).into())).collect())
            }
        }
    }
}

/// Handle to the adapter's live cursor.
///
/// Only the most recent handle is live; a new query invalidates every earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorId(pub(crate) u64);

impl std::fmt::Display for CursorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape requested when fetching a row from a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FetchMode {
    /// Values by position
    Numeric,
    /// Values keyed by column name
    Associative,
    /// A JSON object keyed by column name
    Object,
}

/// Cursor type requested from the vendor client for a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    /// Forward-only cursor; enough to report affected rows.
    Forward,
    /// Scrollable keyset cursor so the number of rows is known.
    Keyset,
    /// Static cursor, run as a plain batch in the session scope.
    Static,
}

/// Leading keywords of statements that must run in the session scope rather than inside a
/// server-side procedure call.
const SESSION_KEYWORDS: [&str; 6] = ["USE", "SET", "BEGIN", "COMMIT", "ROLLBACK", "SAVE"];

impl CursorKind {
    /// `SELECT` statements get a keyset cursor so `num_rows` works; database switches, session
    /// options and transaction control get a static cursor; everything else gets the minimal
    /// forward-only cursor. Leading comments are skipped.
    #[must_use]
    pub fn for_statement(sql: &str) -> Self {
        match leading_word(sql) {
            Some(word) if word.eq_ignore_ascii_case("SELECT") => CursorKind::Keyset,
            Some(word) if SESSION_KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k)) => {
                CursorKind::Static
            }
            _ => CursorKind::Forward,
        }
    }
}

/// What a batch does after a statement fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failing statement.
    #[default]
    Abort,
    /// Record the failure and keep executing.
    Continue,
}
