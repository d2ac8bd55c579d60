use chrono::{NaiveDate, NaiveDateTime};
use futures_util::TryStreamExt;
use tiberius::QueryItem;
use tiberius::numeric::Numeric;

use super::client::{CLIENT_ERROR, MssqlClient};
use crate::results::BufferedCursor;
use crate::translation::leading_word;
use crate::types::{CursorKind, RowValues};
use crate::vendor::EngineError;

pub(super) fn engine_error(error: tiberius::error::Error) -> EngineError {
    match error {
        tiberius::error::Error::Server(token) => {
            EngineError::new(token.code().to_string(), token.message())
        }
        other => EngineError::new(CLIENT_ERROR, other.to_string()),
    }
}

/// Statements whose affected row count is read back with `@@ROWCOUNT`.
const ROW_COUNTING_KEYWORDS: [&str; 4] = ["INSERT", "UPDATE", "DELETE", "MERGE"];

/// The batch sent for a DML statement: the statement followed by a `@@ROWCOUNT` select.
/// `None` for anything else; `CREATE PROCEDURE` and friends must be alone in their batch.
fn with_row_count(sql: &str) -> Option<String> {
    let word = leading_word(sql)?;
    if !ROW_COUNTING_KEYWORDS
        .iter()
        .any(|k| word.eq_ignore_ascii_case(k))
    {
        return None;
    }
    let statement = sql.trim_end().trim_end_matches(';');
    Some(format!("{statement}\n;SELECT @@ROWCOUNT"))
}

/// Execute one statement and buffer its first result set.
///
/// Everything runs as a plain batch in the session scope, so `USE`, `SET`, temporary tables
/// and transaction control stay in effect for the following statements. DML statements get
/// their affected row count from a trailing `@@ROWCOUNT` select, which is stripped from the
/// results.
pub(super) async fn run_statement(
    client: &mut MssqlClient,
    sql: &str,
    kind: CursorKind,
) -> Result<BufferedCursor, EngineError> {
    let counted = with_row_count(sql);
    let batch = counted.as_deref().unwrap_or(sql);

    let mut stream = client.simple_query(batch).await.map_err(engine_error)?;
    let mut result_sets: Vec<(Vec<String>, Vec<Vec<RowValues>>)> = Vec::new();
    while let Some(item) = stream.try_next().await.map_err(engine_error)? {
        match item {
            QueryItem::Metadata(meta) => {
                let columns = meta
                    .columns()
                    .iter()
                    .map(|col| col.name().to_string())
                    .collect();
                result_sets.push((columns, Vec::new()));
            }
            QueryItem::Row(row) => {
                if let Some((_, rows)) = result_sets.last_mut() {
                    rows.push(row_values(&row));
                }
            }
        }
    }

    let rows_affected = if counted.is_some() {
        result_sets
            .pop()
            .and_then(|(_, rows)| rows.into_iter().next())
            .and_then(|row| row.first().and_then(RowValues::to_i64_lossy))
            .and_then(|count| u64::try_from(count).ok())
            .unwrap_or(0)
    } else {
        0
    };

    let cursor = match result_sets.into_iter().next() {
        Some((columns, rows)) => BufferedCursor::new(kind, columns, rows),
        None => BufferedCursor::empty(kind),
    };
    Ok(cursor.with_rows_affected(rows_affected))
}

fn row_values(row: &tiberius::Row) -> Vec<RowValues> {
    (0..row.len())
        .map(|idx| extract_value(row, idx).unwrap_or(RowValues::Null))
        .collect()
}

/// Extract a value from a row at a specific index; `None` for NULL or unreadable values.
fn extract_value(row: &tiberius::Row, idx: usize) -> Option<RowValues> {
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return Some(RowValues::Int(i64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return Some(RowValues::Int(val));
    }
    if let Ok(Some(val)) = row.try_get::<i16, _>(idx) {
        return Some(RowValues::Int(i64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<u8, _>(idx) {
        return Some(RowValues::Int(i64::from(val)));
    }

    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return Some(RowValues::Float(f64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return Some(RowValues::Float(val));
    }
    // decimal/numeric, including the numeric(38,0) that @@IDENTITY reports
    if let Ok(Some(val)) = row.try_get::<Numeric, _>(idx) {
        return Some(numeric_value(val));
    }

    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return Some(RowValues::Bool(val));
    }

    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return Some(RowValues::Timestamp(val));
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDate, _>(idx) {
        return val.and_hms_opt(0, 0, 0).map(RowValues::Timestamp);
    }

    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return Some(RowValues::Text(val.to_string()));
    }

    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return Some(RowValues::Blob(val.to_vec()));
    }

    None
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn numeric_value(val: Numeric) -> RowValues {
    if val.scale() == 0
        && let Ok(int) = i64::try_from(val.value())
    {
        return RowValues::Int(int);
    }
    RowValues::Float(val.value() as f64 / 10f64.powi(i32::from(val.scale())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dml_reads_back_its_row_count() {
        assert_eq!(
            with_row_count("UPDATE t SET a = 1;").as_deref(),
            Some("UPDATE t SET a = 1\n;SELECT @@ROWCOUNT")
        );
        assert_eq!(
            with_row_count("/* audit */ insert into t output inserted.id values (1) -- new").as_deref(),
            Some("/* audit */ insert into t output inserted.id values (1) -- new\n;SELECT @@ROWCOUNT")
        );
        assert_eq!(with_row_count("WITH c AS (SELECT 1 AS n) SELECT n FROM c"), None);
        assert_eq!(with_row_count("EXEC dbo.refresh"), None);
        assert_eq!(with_row_count("CREATE PROCEDURE p AS SELECT 1"), None);
        assert_eq!(with_row_count("DECLARE @x int; SELECT @x"), None);
    }

    #[test]
    fn identity_numerics_become_integers() {
        assert_eq!(numeric_value(Numeric::new_with_scale(42, 0)), RowValues::Int(42));
        assert_eq!(numeric_value(Numeric::new_with_scale(1250, 2)), RowValues::Float(12.5));
    }
}
