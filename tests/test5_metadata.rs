use chrono::NaiveDateTime;
use mssql_adapter::prelude::*;
use mssql_adapter::test_utils::ScriptedClient;

mod common;

#[test]
fn lists_user_tables() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().respond(
        "FROM sysobjects",
        &["name"],
        vec![
            vec![RowValues::Text("jos_content".into())],
            vec![RowValues::Text("jos_users".into())],
        ],
    );
    let mut db = common::connected(&client);
    db.set_query("SELECT 1".into());

    assert_eq!(db.table_list()?, vec!["jos_content", "jos_users"]);
    assert_eq!(client.executed(), vec!["SELECT name FROM sysobjects WHERE xtype = 'U';"]);
    assert_eq!(db.current_query().sql(), "SELECT 1");
    Ok(())
}

#[test]
fn describes_table_columns() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().respond(
        "information_schema.columns",
        &["Field", "Type", "Null", "Default"],
        vec![
            vec![
                RowValues::Text("id".into()),
                RowValues::Text("int".into()),
                RowValues::Text("NO".into()),
                RowValues::Null,
            ],
            vec![
                RowValues::Text("title".into()),
                RowValues::Text("nvarchar(255)".into()),
                RowValues::Text("YES".into()),
                RowValues::Text("('')".into()),
            ],
        ],
    );
    let mut db = common::connected(&client);

    let full = db.table_fields(&["#__content"], false)?;
    let fields = &full["jos_content"];
    assert_eq!(fields[1].data_type, "nvarchar(255)");
    assert_eq!(fields[1].null.as_deref(), Some("YES"));
    assert_eq!(fields[0].default, None);
    assert!(client.executed()[0].ends_with("WHERE table_name = 'jos_content'"));

    let types = db.table_fields(&["#__content"], true)?;
    let title = &types["jos_content"][1];
    assert_eq!(
        title,
        &TableField {
            field: "title".into(),
            data_type: "nvarchar".into(),
            null: None,
            default: None,
        }
    );
    Ok(())
}

#[test]
fn table_create_is_empty_for_this_dialect() -> Result<(), AdapterError> {
    let client = ScriptedClient::new();
    let mut db = common::connected(&client);

    assert!(db.table_create(&["jos_content"])?.is_empty());
    assert!(client.executed().is_empty());
    Ok(())
}

#[test]
fn version_and_identity_come_from_their_own_queries() -> Result<(), AdapterError> {
    let client = ScriptedClient::new()
        .respond("SERVERPROPERTY", &[""], vec![vec![RowValues::Text("16.0.1000.6".into())]])
        .respond("@@IDENTITY", &[""], vec![vec![RowValues::Float(42.0)]]);
    let mut db = common::connected(&client);

    assert_eq!(db.version()?, "16.0.1000.6");
    assert_eq!(db.insert_id()?, 42);
    assert_eq!(
        client.executed(),
        vec!["SELECT SERVERPROPERTY('ProductVersion')", "SELECT @@IDENTITY"]
    );
    Ok(())
}

#[test]
fn insert_id_without_identity_is_zero() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().respond("@@IDENTITY", &[""], vec![vec![RowValues::Null]]);
    let mut db = common::connected(&client);

    assert_eq!(db.insert_id()?, 0);
    Ok(())
}

#[test]
fn field_exists_checks_the_information_schema() -> Result<(), AdapterError> {
    let client = ScriptedClient::new()
        .respond("COLUMN_NAME = 'title'", &[""], vec![vec![RowValues::Int(1)]])
        .respond("COLUMN_NAME = 'nope'", &[""], vec![vec![RowValues::Int(0)]]);
    let mut db = common::connected(&client);

    assert!(db.field_exists("#__content", "title")?);
    assert!(!db.field_exists("#__content", "nope")?);
    assert!(client.executed()[0].contains("TABLE_NAME = 'jos_content'"));
    Ok(())
}

#[test]
fn explain_switches_showplan_around_the_query() -> Result<(), AdapterError> {
    let client = ScriptedClient::new().respond(
        "FROM jos_content",
        &["StmtText", "EstimateRows"],
        vec![vec![RowValues::Text("SELECT id FROM jos_content".into()), RowValues::Float(1.0)]],
    );
    let mut db = common::connected(&client);
    db.set_query("SELECT id FROM #__content".into());

    let plan = db.explain()?;

    assert_eq!(plan.len(), 1);
    assert_eq!(
        client.executed(),
        vec!["SET SHOWPLAN_ALL ON", "SELECT id FROM jos_content", "SET SHOWPLAN_ALL OFF"]
    );
    Ok(())
}

#[test]
fn explain_turns_showplan_off_after_a_failure() {
    let client = ScriptedClient::new().fail_when("FROM missing", "208", "Invalid object name 'missing'.");
    let mut db = common::connected(&client);
    db.set_query("SELECT id FROM missing".into());

    assert!(db.explain().is_err());
    assert_eq!(client.executed().last().map(String::as_str), Some("SET SHOWPLAN_ALL OFF"));
}

#[test]
fn dialect_facts() {
    let db = SqlSrvAdapter::new(ScriptedClient::new(), common::config());
    let date = NaiveDateTime::parse_from_str("2011-07-01 10:20:30", "%Y-%m-%d %H:%M:%S").unwrap();

    assert_eq!(db.null_date(), "1900-01-01 00:00:00");
    assert_eq!(db.collation(), "MSSQL UTF-8 (UCS2)");
    assert!(db.has_utf());
    assert_eq!(db.date_to_string(&date), "2011-07-01 10:20:30");
}

#[test]
fn escape_and_quote() {
    let db = SqlSrvAdapter::new(ScriptedClient::new(), common::config());

    assert_eq!(db.escape("O'Brien", false), "O''Brien");
    assert_eq!(db.escape("a_b", true), "a[_]b");
    assert_eq!(db.escape("a_b", false), "a_b");
    assert_eq!(db.quote("it's"), "'it''s'");
}
