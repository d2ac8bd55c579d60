use super::keywords::{find_keyword, starts_with_keyword};
use crate::error::AdapterError;

/// Column added to a paginated statement to number its rows.
pub const ROW_NUMBER_COLUMN: &str = "RowNumber";
/// Alias of the derived table wrapping a paginated statement.
pub const RESULTS_ALIAS: &str = "_myResults";

const NO_OP_ORDER_BY: &str = "ORDER BY (select 0)";

/// Rewrite a `SELECT` so it returns rows `offset + 1 ..= offset + limit` of its ordering.
///
/// SQL Server has no `LIMIT`/`OFFSET` here, so the statement is numbered with
/// `ROW_NUMBER() OVER (<order by>)` and wrapped in an outer `SELECT TOP <limit>` filtering on
/// the number. The statement's own `ORDER BY` (everything from the first top-level `ORDER BY`
/// to the end) becomes the window ordering; without one an arbitrary ordering is used.
/// A `limit` of 0 means no limit.
///
/// Only the first `FROM` is rewritten, and it must not be nested: a subquery in the column
/// list ahead of the real `FROM` is rejected rather than rewritten. Keywords inside string
/// literals, quoted identifiers and comments are ignored.
///
/// The output is T-SQL-specific and must be rewritten at most once.
///
/// # Errors
///
/// Returns `AdapterError::InvalidQuery` for statements that are not a `SELECT`, have no
/// top-level `FROM`, nest their first `ORDER BY`, or were already rewritten.
///
/// ```rust
/// use mssql_adapter::translation::rewrite_limit;
///
/// let sql = rewrite_limit("SELECT id FROM users ORDER BY id", 10, 20).unwrap();
/// assert_eq!(
///     sql,
///     "SELECT TOP 10 * FROM (SELECT id, ROW_NUMBER() OVER (ORDER BY id) AS RowNumber \
///      FROM users) _myResults WHERE RowNumber > 20"
/// );
/// ```
pub fn rewrite_limit(sql: &str, limit: u64, offset: u64) -> Result<String, AdapterError> {
    let body = sql.trim().trim_end_matches(';').trim_end();

    if !starts_with_keyword(body, "SELECT") {
        return Err(AdapterError::InvalidQuery(
            "pagination can only be applied to a SELECT statement".to_string(),
        ));
    }
    if find_keyword(body, &["AS", ROW_NUMBER_COLUMN]).is_some() {
        return Err(AdapterError::InvalidQuery(format!(
            "statement already carries a {ROW_NUMBER_COLUMN} column; pagination cannot be applied twice"
        )));
    }

    let (body, order_by) = match find_keyword(body, &["ORDER", "BY"]) {
        Some(found) if found.depth > 0 => {
            return Err(AdapterError::InvalidQuery(
                "the first ORDER BY is nested in an expression and cannot be lifted into the row numbering"
                    .to_string(),
            ));
        }
        Some(found) => (body[..found.start].trim_end(), body[found.start..].trim()),
        None => (body, NO_OP_ORDER_BY),
    };

    let from = find_keyword(body, &["FROM"])
        .ok_or_else(|| AdapterError::InvalidQuery("no FROM clause to paginate".to_string()))?;
    if from.depth > 0 {
        return Err(AdapterError::InvalidQuery(
            "the first FROM belongs to a subquery in the column list".to_string(),
        ));
    }

    let columns = body[..from.start].trim_end();
    let source = body[from.end..].trim_start();
    let numbered = format!(
        "{columns}, ROW_NUMBER() OVER ({order_by}) AS {ROW_NUMBER_COLUMN} FROM {source}"
    );

    let top = if limit > 0 {
        format!("TOP {limit} ")
    } else {
        String::new()
    };
    Ok(format!(
        "SELECT {top}* FROM ({numbered}) {RESULTS_ALIAS} WHERE {ROW_NUMBER_COLUMN} > {offset}"
    ))
}
