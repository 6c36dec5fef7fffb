//! Scripted executor for unit tests: replays canned replies and records each statement.

use crate::catalog::{Catalog, Field, FieldType, Table};
use crate::service::{RawCell, RawRow, SqlExecutor};
use crate::value::FieldValue;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) enum Reply {
    Rows(Vec<RawRow>),
    Affected(u64),
    Fail(String),
}

pub(crate) struct ScriptedExecutor {
    replies: Mutex<VecDeque<Reply>>,
    log: Mutex<Vec<(String, Vec<FieldValue>)>>,
}

impl ScriptedExecutor {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        ScriptedExecutor {
            replies: Mutex::new(replies.into()),
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn statements(&self) -> Vec<(String, Vec<FieldValue>)> {
        self.log.lock().unwrap().clone()
    }

    fn next(&self, sql: &str, params: &[FieldValue]) -> Reply {
        self.log.lock().unwrap().push((sql.to_string(), params.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected statement: {}", sql))
    }
}

#[async_trait]
impl SqlExecutor for ScriptedExecutor {
    async fn query(&self, sql: &str, params: &[FieldValue]) -> Result<Vec<RawRow>, sqlx::Error> {
        match self.next(sql, params) {
            Reply::Rows(rows) => Ok(rows),
            Reply::Fail(msg) => Err(sqlx::Error::Protocol(msg)),
            Reply::Affected(_) => panic!("expected rows for: {}", sql),
        }
    }

    async fn query_row(&self, sql: &str, params: &[FieldValue]) -> Result<Option<RawRow>, sqlx::Error> {
        Ok(self.query(sql, params).await?.into_iter().next())
    }

    async fn exec(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error> {
        match self.next(sql, params) {
            Reply::Affected(n) => Ok(n),
            Reply::Fail(msg) => Err(sqlx::Error::Protocol(msg)),
            Reply::Rows(_) => panic!("expected affected count for: {}", sql),
        }
    }
}

pub(crate) fn row(cells: &[(&str, Option<&str>)]) -> RawRow {
    RawRow::new(
        cells
            .iter()
            .map(|(name, value)| RawCell {
                name: name.to_string(),
                value: value.map(str::to_string),
            })
            .collect(),
    )
}

/// `users(id int4 pk, name varchar not null, age int4 null)` plus a key-less `events(body text)`.
pub(crate) fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        Table::new(
            "public",
            "users",
            vec![
                Field::new("id", FieldType::Integer, false, true).with_sql_type("int4"),
                Field::new("name", FieldType::Text, false, false).with_sql_type("varchar"),
                Field::new("age", FieldType::Integer, true, false).with_sql_type("int4"),
            ],
        ),
        Table::new(
            "public",
            "events",
            vec![Field::new("body", FieldType::Text, true, false)],
        ),
    ])
}
