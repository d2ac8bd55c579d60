use mssql_adapter::prelude::*;
use mssql_adapter::test_utils::ScriptedClient;

mod common;

#[test]
fn query_rewrites_pagination_and_replaces_prefix() -> Result<(), AdapterError> {
    let client = ScriptedClient::new();
    let mut db = common::connected(&client);

    db.set_query(Query::new("SELECT id, title FROM #__content ORDER BY id").with_limit(10).with_offset(20));
    db.query()?;

    assert_eq!(
        client.executed_with_kind(),
        vec![(
            "SELECT TOP 10 * FROM (SELECT id, title, ROW_NUMBER() OVER (ORDER BY id) AS RowNumber \
             FROM jos_content) _myResults WHERE RowNumber > 20"
                .to_string(),
            CursorKind::Keyset
        )]
    );
    Ok(())
}

#[test]
fn unpaginated_queries_run_as_written() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().affect("UPDATE", 3);
    let mut db = common::connected(&client);

    db.set_query("UPDATE #__users SET block = 0".into());
    db.query()?;

    assert_eq!(
        client.executed_with_kind(),
        vec![("UPDATE jos_users SET block = 0".to_string(), CursorKind::Forward)]
    );
    assert_eq!(db.affected_rows()?, 3);
    assert!(db.num_rows(None).is_err());
    Ok(())
}

#[test]
fn fetches_rows_in_every_shape() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().respond(
        "FROM users",
        &["id", "name"],
        vec![
            vec![RowValues::Int(1), RowValues::Text("alice".into())],
            vec![RowValues::Int(2), RowValues::Text("bob".into())],
            vec![RowValues::Int(3), RowValues::Null],
        ],
    );
    let mut db = common::connected(&client);

    db.set_query("SELECT id, name FROM users".into());
    let cursor = db.query()?;
    assert_eq!(db.num_rows(Some(cursor))?, 3);

    let first = db.fetch_array(Some(cursor))?.expect("first row");
    assert_eq!(first, vec![RowValues::Int(1), RowValues::Text("alice".into())]);

    let second = db.fetch_assoc(None)?.expect("second row");
    assert_eq!(second.get("NAME").and_then(RowValues::as_text), Some("bob"));

    let third = db.fetch_object(Some(cursor))?.expect("third row");
    assert_eq!(third.get("id"), Some(&serde_json::json!(3)));
    assert_eq!(third.get("name"), Some(&serde_json::Value::Null));

    assert!(db.fetch_array(Some(cursor))?.is_none());
    Ok(())
}

#[test]
fn failures_carry_code_message_and_sql() {
    let client = ScriptedClient::new().fail_when("missing", "208", "Invalid object name 'missing'.");
    let (mut db, log) = common::connected_with_log(&client);

    db.set_query("SELECT * FROM missing".into());
    let err = db.query().unwrap_err();

    match err {
        AdapterError::ExecutionFailure { code, message, sql } => {
            assert_eq!(code, "208");
            assert_eq!(message, "Invalid object name 'missing'.");
            assert_eq!(sql, "SELECT * FROM missing");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(db.last_error().map(|e| e.code.as_str()), Some("208"));
    assert_eq!(db.last_errors().len(), 1);
    assert_eq!(
        log.failures(),
        vec![("208".to_string(), "Invalid object name 'missing'.".to_string())]
    );
}

#[test]
fn nested_order_by_is_rejected_before_execution() {
    let client = ScriptedClient::new();
    let mut db = common::connected(&client);

    db.set_query(Query::new("SELECT (SELECT TOP 1 x FROM y ORDER BY x) AS a FROM t").with_limit(5));
    assert!(matches!(db.query(), Err(AdapterError::InvalidQuery(_))));
    assert!(client.executed().is_empty());
}

#[test]
fn debug_mode_counts_and_logs_statements() -> Result<(), AdapterError> {
    let client = ScriptedClient::new();
    let (mut db, log) = common::connected_with_log(&client);

    db.set_query("SELECT 1".into());
    db.query()?;
    db.query()?;

    assert_eq!(db.query_count(), 2);
    assert_eq!(log.statements(), vec!["SELECT 1".to_string(), "SELECT 1".to_string()]);
    Ok(())
}

#[test]
fn not_connected_fails_fast() {
    let client = ScriptedClient::new();
    let mut db = SqlSrvAdapter::new(client.clone(), common::config());

    db.set_query("SELECT 1".into());
    let err = db.query().unwrap_err();
    assert_eq!(err.code(), Some(mssql_adapter::error::CONNECTION_NOT_OPEN));
    assert!(client.executed().is_empty());
}

#[test]
fn load_helpers_read_the_current_query() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().respond(
        "FROM tags",
        &["id", "title"],
        vec![
            vec![RowValues::Int(7), RowValues::Text("rust".into())],
            vec![RowValues::Int(9), RowValues::Text("sql".into())],
        ],
    );
    let mut db = common::connected(&client);
    db.set_query("SELECT id, title FROM tags".into());

    assert_eq!(db.load_result()?, Some(RowValues::Int(7)));
    assert_eq!(db.load_column()?, vec![RowValues::Int(7), RowValues::Int(9)]);

    let rows = db.load_assoc_list()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get("title").and_then(RowValues::as_text), Some("sql"));

    let keyed = db.load_assoc_map("title")?;
    assert_eq!(keyed.keys().cloned().collect::<Vec<_>>(), vec!["rust", "sql"]);
    Ok(())
}
