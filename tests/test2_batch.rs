use mssql_adapter::prelude::*;
use mssql_adapter::test_utils::ScriptedClient;

mod common;

const THREE_STATEMENTS: &str =
    "INSERT INTO #__log VALUES (1); INSERT INTO broken VALUES (2); INSERT INTO #__log VALUES (3);";

fn success_flags(result: &BatchResult) -> Vec<bool> {
    result.outcomes().iter().map(StatementOutcome::is_success).collect()
}

#[test]
fn abort_stops_at_the_first_failure() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().fail_when("broken", "208", "Invalid object name 'broken'.");
    let mut db = common::connected(&client);

    let result = db.execute_batch(THREE_STATEMENTS, ErrorPolicy::Abort, false)?;

    assert_eq!(success_flags(&result), vec![true, false]);
    assert!(!result.succeeded());
    assert_eq!(result.last_error(), Some(("208", "Invalid object name 'broken'.")));
    assert_eq!(
        client.executed(),
        vec![
            "INSERT INTO jos_log VALUES (1)".to_string(),
            "INSERT INTO broken VALUES (2)".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn continue_runs_every_statement_but_still_reports_failure() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().fail_when("broken", "208", "Invalid object name 'broken'.");
    let mut db = common::connected(&client);

    let result = db.execute_batch(THREE_STATEMENTS, ErrorPolicy::Continue, false)?;

    assert_eq!(success_flags(&result), vec![true, false, true]);
    assert_eq!(result.failures(), 1);
    assert!(!result.succeeded());
    assert_eq!(client.executed().len(), 3);
    Ok(())
}

#[test]
fn transaction_safe_batches_grow_by_two_statements() -> Result<(), AdapterError> {
    let client = ScriptedClient::new();
    let mut db = common::connected(&client);

    let plain = db.execute_batch("DELETE FROM a; DELETE FROM b", ErrorPolicy::Abort, false)?;
    let wrapped = db.execute_batch("DELETE FROM a; DELETE FROM b", ErrorPolicy::Abort, true)?;

    assert_eq!(plain.len(), 2);
    assert_eq!(wrapped.len(), 4);
    assert!(wrapped.succeeded());

    let executed = client.executed_with_kind();
    assert_eq!(
        executed[2..],
        [
            ("BEGIN TRANSACTION".to_string(), CursorKind::Static),
            ("DELETE FROM a".to_string(), CursorKind::Forward),
            ("DELETE FROM b".to_string(), CursorKind::Forward),
            ("COMMIT TRANSACTION".to_string(), CursorKind::Static),
        ]
    );
    Ok(())
}

#[test]
fn aborted_transaction_safe_batch_rolls_back() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().fail_when("broken", "208", "Invalid object name 'broken'.");
    let mut db = common::connected(&client);

    let result = db.execute_batch(THREE_STATEMENTS, ErrorPolicy::Abort, true)?;

    assert_eq!(success_flags(&result), vec![true, true, false]);
    assert_eq!(
        client.executed().last().map(String::as_str),
        Some("IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION")
    );
    assert!(!client.executed().iter().any(|sql| sql == "COMMIT TRANSACTION"));
    Ok(())
}

#[test]
fn semicolons_in_literals_do_not_split() -> Result<(), AdapterError> {
    let client = ScriptedClient::new();
    let mut db = common::connected(&client);

    let result = db.execute_batch(
        "INSERT INTO notes VALUES ('a;b'); -- trailing; comment\nUPDATE [x;y] SET n = 1;",
        ErrorPolicy::Abort,
        false,
    )?;

    assert_eq!(result.len(), 2);
    assert_eq!(client.executed()[0], "INSERT INTO notes VALUES ('a;b')");
    Ok(())
}

#[test]
fn query_batch_uses_the_configured_policy() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().fail_when("broken", "208", "Invalid object name 'broken'.");
    let config = AdapterConfig::builder()
        .auto_select(false)
        .error_policy(ErrorPolicy::Continue)
        .finish();
    let mut db = SqlSrvAdapter::open(client.clone(), config)?;

    db.set_query(THREE_STATEMENTS.into());
    let result = db.query_batch(false)?;

    assert_eq!(result.len(), 3);
    Ok(())
}

#[test]
fn batches_need_a_connection() {
    let client = ScriptedClient::new();
    let mut db = SqlSrvAdapter::new(client.clone(), common::config());

    let err = db
        .execute_batch("SELECT 1; SELECT 2", ErrorPolicy::Continue, false)
        .unwrap_err();
    assert!(matches!(err, AdapterError::ExecutionFailure { .. }));
    assert!(client.executed().is_empty());
}

#[test]
fn transaction_safe_batch_is_refused_inside_a_transaction() -> Result<(), AdapterError> {
    let client = ScriptedClient::new();
    let mut db = common::connected(&client);
    db.transaction_start()?;

    let err = db
        .execute_batch("DELETE FROM a; DELETE FROM b", ErrorPolicy::Abort, true)
        .unwrap_err();

    assert!(matches!(err, AdapterError::Transaction(_)));
    assert_eq!(client.executed(), vec!["BEGIN TRANSACTION".to_string()]);
    assert_eq!(db.transaction_state(), TransactionState::Active);

    let plain = db.execute_batch("DELETE FROM a", ErrorPolicy::Abort, false)?;
    assert!(plain.succeeded());
    db.transaction_commit()?;
    assert_eq!(db.transaction_state(), TransactionState::None);
    Ok(())
}

#[test]
fn continued_batch_keeps_its_failure_as_last_error() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().fail_when("broken", "208", "Invalid object name 'broken'.");
    let mut db = common::connected(&client);

    let result = db.execute_batch(THREE_STATEMENTS, ErrorPolicy::Continue, false)?;

    assert_eq!(success_flags(&result), vec![true, false, true]);
    let last = db.last_error().map(|e| (e.code.as_str(), e.message.as_str()));
    assert_eq!(last, Some(("208", "Invalid object name 'broken'.")));
    Ok(())
}

#[test]
fn rollback_after_abort_keeps_the_failure_as_last_error() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().fail_when("broken", "208", "Invalid object name 'broken'.");
    let mut db = common::connected(&client);

    db.execute_batch(THREE_STATEMENTS, ErrorPolicy::Abort, true)?;

    assert_eq!(
        client.executed().last().map(String::as_str),
        Some("IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION")
    );
    assert_eq!(db.last_error().map(|e| e.code.as_str()), Some("208"));

    db.execute_batch("DELETE FROM a", ErrorPolicy::Abort, false)?;
    assert!(db.last_error().is_none());
    Ok(())
}

#[test]
fn comment_led_and_cte_statements_keep_their_rows() -> Result<(), AdapterError> {
    let client = ScriptedClient::new()
        .respond("FROM recent", &["id"], vec![vec![RowValues::Int(9)]])
        .respond("FROM pages", &["id"], vec![vec![RowValues::Int(7)]]);
    let mut db = common::connected(&client);

    let result = db.execute_batch(
        "/* page */ SELECT id FROM pages;\nWITH recent AS (SELECT id FROM pages) SELECT id FROM recent;",
        ErrorPolicy::Abort,
        false,
    )?;

    assert!(result.succeeded());
    let kinds: Vec<CursorKind> = client.executed_with_kind().into_iter().map(|(_, k)| k).collect();
    assert_eq!(kinds, vec![CursorKind::Keyset, CursorKind::Forward]);

    let row = db.fetch_array(None)?;
    assert_eq!(row, Some(vec![RowValues::Int(9)]));
    Ok(())
}
