use mssql_adapter::prelude::*;
use mssql_adapter::test_utils::ScriptedClient;

mod common;

fn two_rows() -> ScriptedClient {
    ScriptedClient::new().respond(
        "FROM t",
        &["n"],
        vec![vec![RowValues::Int(1)], vec![RowValues::Int(2)]],
    )
}

#[test]
fn a_new_query_invalidates_older_handles() -> Result<(), AdapterError> {
    let client = two_rows();
    let mut db = common::connected(&client);

    db.set_query("SELECT n FROM t".into());
    let first = db.query()?;
    let second = db.query()?;
    assert_ne!(first, second);

    assert!(matches!(db.fetch_array(Some(first)), Err(AdapterError::InvalidCursor(_))));
    assert!(matches!(db.num_rows(Some(first)), Err(AdapterError::InvalidCursor(_))));
    assert!(matches!(db.free_result(Some(first)), Err(AdapterError::InvalidCursor(_))));
    assert_eq!(db.num_rows(Some(second))?, 2);
    assert_eq!(client.freed_cursors(), 1);
    Ok(())
}

#[test]
fn freeing_drops_the_live_cursor() -> Result<(), AdapterError> {
    let client = two_rows();
    let mut db = common::connected(&client);

    db.set_query("SELECT n FROM t".into());
    let cursor = db.query()?;
    db.free_result(Some(cursor))?;

    assert_eq!(client.freed_cursors(), 1);
    assert!(matches!(db.fetch_assoc(None), Err(AdapterError::InvalidCursor(_))));
    assert!(matches!(db.free_result(Some(cursor)), Err(AdapterError::InvalidCursor(_))));
    db.free_result(None)?;
    Ok(())
}

#[test]
fn batches_leave_the_last_statement_cursor_live() -> Result<(), AdapterError> {
    let client = two_rows();
    let mut db = common::connected(&client);

    let result = db.execute_batch("DELETE FROM u; SELECT n FROM t", ErrorPolicy::Abort, false)?;
    let Some(Outcome::Success(cursor)) = result.outcomes().last().map(|o| o.outcome.clone()) else {
        panic!("last statement should succeed");
    };

    assert_eq!(db.num_rows(Some(cursor))?, 2);
    assert_eq!(db.fetch_array(Some(cursor))?, Some(vec![RowValues::Int(1)]));
    Ok(())
}
