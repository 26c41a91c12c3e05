/*
In-Memory Table Adapter

RemoteTablePort implementation that keeps every table in process memory.
It mirrors the behaviour of the hosted platform closely enough for local runs
and tests:

- inserts receive a generated UUID when no `id` is supplied
- timestamps stored as RFC 3339 strings order chronologically
- updates with no matching rows return an empty list
- deletes with no matching rows report NotFound
*/

use crate::application::ports::output::table_port::{
    Filter, RemoteTablePort, Row, TablePortError, TablePortResult, TableQuery,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Per-table write counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableWriteStats {
    pub inserts: u64,
    pub updates: u64,
    pub deletes: u64,
}

#[derive(Debug, Default)]
pub struct InMemoryTableAdapter {
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
    stats: Arc<RwLock<HashMap<String, TableWriteStats>>>,
}

impl InMemoryTableAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rows directly, bypassing write accounting. Non-object values are skipped.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        if let Ok(mut tables) = self.tables.write() {
            let entry = tables.entry(table.to_string()).or_default();
            entry.extend(rows.into_iter().filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            }));
        }
    }

    /// Snapshot of a table's rows in insertion order
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn write_stats(&self, table: &str) -> TableWriteStats {
        self.stats
            .read()
            .map(|stats| stats.get(table).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    fn record_write(&self, table: &str, apply: impl FnOnce(&mut TableWriteStats)) -> TablePortResult<()> {
        let mut stats = self.stats.write().map_err(|_| {
            TablePortError::Unavailable("Table statistics unavailable".to_string())
        })?;
        apply(stats.entry(table.to_string()).or_default());
        Ok(())
    }
}

fn storage_unavailable() -> TablePortError {
    TablePortError::Unavailable("Table storage unavailable".to_string())
}

/// Order two column values. Strings that parse as timestamps compare chronologically.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::String(x), Value::String(y)) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(tx), Ok(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn project(row: &Row, columns: &[String]) -> Row {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
        .collect()
}

fn matches_all(filters: &[Filter], row: &Row) -> bool {
    filters.iter().all(|f| f.matches(row))
}

#[async_trait]
impl RemoteTablePort for InMemoryTableAdapter {
    async fn query(&self, table: &str, query: TableQuery) -> TablePortResult<Vec<Row>> {
        let tables = self.tables.read().map_err(|_| storage_unavailable())?;

        let mut rows: Vec<&Row> = tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let lhs = a.get(&order.column).unwrap_or(&Value::Null);
                let rhs = b.get(&order.column).unwrap_or(&Value::Null);
                compare_values(rhs, lhs)
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows.into_iter().map(|r| project(r, &query.columns)).collect())
    }

    async fn insert(&self, table: &str, mut record: Row) -> TablePortResult<Row> {
        let has_id = matches!(record.get("id"), Some(Value::String(id)) if !id.is_empty());
        if !has_id {
            record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }

        {
            let mut tables = self.tables.write().map_err(|_| storage_unavailable())?;
            tables.entry(table.to_string()).or_default().push(record.clone());
        }

        self.record_write(table, |s| s.inserts += 1)?;
        Ok(record)
    }

    async fn update(&self, table: &str, filters: Vec<Filter>, patch: Row) -> TablePortResult<Vec<Row>> {
        let updated = {
            let mut tables = self.tables.write().map_err(|_| storage_unavailable())?;
            let mut updated = Vec::new();
            if let Some(rows) = tables.get_mut(table) {
                for row in rows.iter_mut().filter(|r| matches_all(&filters, r)) {
                    for (column, value) in &patch {
                        row.insert(column.clone(), value.clone());
                    }
                    updated.push(row.clone());
                }
            }
            updated
        };

        self.record_write(table, |s| s.updates += 1)?;
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: Vec<Filter>) -> TablePortResult<()> {
        let removed = {
            let mut tables = self.tables.write().map_err(|_| storage_unavailable())?;
            match tables.get_mut(table) {
                Some(rows) => {
                    let before = rows.len();
                    rows.retain(|r| !matches_all(&filters, r));
                    before - rows.len()
                }
                None => 0,
            }
        };

        if removed == 0 {
            return Err(TablePortError::NotFound(table.to_string()));
        }

        self.record_write(table, |s| s.deletes += 1)?;
        Ok(())
    }
}
