use std::borrow::Cow;

use super::scanner::{Region, Scanner};

/// Placeholder standing for the configured table prefix in SQL text.
pub const DEFAULT_PREFIX_PLACEHOLDER: &str = "#__";

/// Replace `placeholder` with `prefix` in code and quoted identifiers.
///
/// String literals and comments are left untouched. Returns a borrowed `Cow` when nothing
/// was replaced.
#[must_use]
pub fn replace_prefix<'a>(sql: &'a str, placeholder: &str, prefix: &str) -> Cow<'a, str> {
    if placeholder.is_empty() {
        return Cow::Borrowed(sql);
    }

    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;

    for (idx, region) in Scanner::new(sql) {
        if idx < copied || !matches!(region, Region::Code | Region::Identifier) {
            continue;
        }
        if bytes[idx..].starts_with(placeholder.as_bytes()) {
            let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
            buf.push_str(&sql[copied..idx]);
            buf.push_str(prefix);
            copied = idx + placeholder.len();
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}
