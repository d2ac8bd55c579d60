#![allow(dead_code)]

use mssql_adapter::logging::MemoryQueryLog;
use mssql_adapter::prelude::*;
use mssql_adapter::test_utils::ScriptedClient;

pub type TestAdapter = SqlSrvAdapter<ScriptedClient>;

pub fn config() -> AdapterConfig {
    AdapterConfig::builder()
        .host("db.test")
        .user("sa")
        .password("secret")
        .database("site")
        .finish()
}

/// Connected adapter without the auto-select `USE`, so tests see only their own statements.
pub fn connected(client: &ScriptedClient) -> TestAdapter {
    let config = AdapterConfig::builder().auto_select(false).finish();
    SqlSrvAdapter::open(client.clone(), config).expect("scripted connect succeeds")
}

/// Connected adapter in debug mode, logging into a shared in-memory log.
pub fn connected_with_log(client: &ScriptedClient) -> (TestAdapter, MemoryQueryLog) {
    let log = MemoryQueryLog::new();
    let config = AdapterConfig::builder().auto_select(false).debug(true).finish();
    let adapter = SqlSrvAdapter::new(client.clone(), config).with_query_log(log.clone());
    let mut adapter = adapter;
    adapter.connect().expect("scripted connect succeeds");
    (adapter, log)
}
