/// Escape text for use inside a SQL Server string literal.
///
/// The server client does no escaping of its own. Single quotes are doubled; with `extra`
/// set, `_` is also bracketed (`[_]`) because `LIKE` treats it as a single-character wildcard.
///
/// ```rust
/// use mssql_adapter::translation::escape;
///
/// assert_eq!(escape("it's", false), "it''s");
/// assert_eq!(escape("a_b", true), "a[_]b");
/// ```
#[must_use]
pub fn escape(text: &str, extra: bool) -> String {
    let escaped = text.replace('\'', "''");
    if extra {
        escaped.replace('_', "[_]")
    } else {
        escaped
    }
}

/// Escape `text` and wrap it in single quotes.
#[must_use]
pub fn quote(text: &str) -> String {
    format!("'{}'", escape(text, false))
}
