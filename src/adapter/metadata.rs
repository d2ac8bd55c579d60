use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::SqlSrvAdapter;
use crate::driver::{DatabaseDriver, TableField};
use crate::error::AdapterError;
use crate::query::Query;
use crate::results::CustomDbRow;
use crate::types::{CursorKind, RowValues};
use crate::vendor::VendorClient;

const TABLE_LIST_SQL: &str = "SELECT name FROM sysobjects WHERE xtype = 'U';";
const VERSION_SQL: &str = "SELECT SERVERPROPERTY('ProductVersion')";
const IDENTITY_SQL: &str = "SELECT @@IDENTITY";

static TYPE_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(0-9)]").expect("type decoration pattern is valid"));

fn text_of(row: &CustomDbRow, column: &str) -> Option<String> {
    row.get(column).and_then(RowValues::to_text)
}

impl<C: VendorClient> SqlSrvAdapter<C> {
    /// Run `query` through the `load_*` helpers without losing the caller's current query.
    fn with_scratch_query<T>(
        &mut self,
        query: Query,
        load: impl FnOnce(&mut Self) -> Result<T, AdapterError>,
    ) -> Result<T, AdapterError> {
        let saved = std::mem::replace(&mut self.sql, query);
        let loaded = load(self);
        self.sql = saved;
        loaded
    }

    pub(super) fn list_tables(&mut self) -> Result<Vec<String>, AdapterError> {
        let names = self.with_scratch_query(Query::new(TABLE_LIST_SQL), Self::load_column)?;
        Ok(names.iter().filter_map(RowValues::to_text).collect())
    }

    pub(super) fn describe_tables(
        &mut self,
        tables: &[&str],
        type_only: bool,
    ) -> Result<BTreeMap<String, Vec<TableField>>, AdapterError> {
        let mut described = BTreeMap::new();
        for &table in tables {
            let table = self.replace_prefix(table).into_owned();
            let sql = format!(
                "SELECT column_name as Field, data_type as Type, is_nullable as 'Null', \
                 column_default as 'Default' FROM information_schema.columns WHERE table_name = {}",
                self.quote(&table)
            );
            let rows = self.with_scratch_query(Query::new(sql), Self::load_assoc_list)?;

            let fields = rows
                .iter()
                .map(|row| {
                    let field = text_of(row, "Field").unwrap_or_default();
                    let data_type = text_of(row, "Type").unwrap_or_default();
                    if type_only {
                        TableField {
                            field,
                            data_type: TYPE_DECORATION.replace_all(&data_type, "").into_owned(),
                            null: None,
                            default: None,
                        }
                    } else {
                        TableField {
                            field,
                            data_type,
                            null: text_of(row, "Null"),
                            default: text_of(row, "Default"),
                        }
                    }
                })
                .collect();
            described.insert(table, fields);
        }
        Ok(described)
    }

    pub(super) fn server_version(&mut self) -> Result<String, AdapterError> {
        let version = self.with_scratch_query(Query::new(VERSION_SQL), Self::load_result)?;
        Ok(version.and_then(|v| v.to_text()).unwrap_or_default())
    }

    pub(super) fn last_identity(&mut self) -> Result<i64, AdapterError> {
        let identity = self.with_scratch_query(Query::new(IDENTITY_SQL), Self::load_result)?;
        Ok(identity.and_then(|v| v.to_i64_lossy()).unwrap_or(0))
    }

    /// Whether `table` has a column named `field`.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` if the lookup fails.
    pub fn field_exists(&mut self, table: &str, field: &str) -> Result<bool, AdapterError> {
        let table = self.replace_prefix(table).into_owned();
        let sql = format!(
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_NAME = {} AND COLUMN_NAME = {}",
            self.quote(&table),
            self.quote(field)
        );
        let count = self.with_scratch_query(Query::new(sql), Self::load_result)?;
        Ok(count.and_then(|v| v.to_i64_lossy()).unwrap_or(0) > 0)
    }

    /// Execution plan of the current query, one row per plan step.
    ///
    /// The plan is read with `SHOWPLAN_ALL` switched on; it is switched off again even if
    /// reading the plan fails.
    ///
    /// # Errors
    ///
    /// `ExecutionFailure` if a statement fails, `InvalidQuery` if pagination cannot be applied.
    pub fn explain(&mut self) -> Result<Vec<CustomDbRow>, AdapterError> {
        self.run("SET SHOWPLAN_ALL ON", CursorKind::Static)?;
        let plan = self.load_assoc_list();
        let reset = self.run("SET SHOWPLAN_ALL OFF", CursorKind::Static);
        let plan = plan?;
        reset?;
        Ok(plan)
    }
}
