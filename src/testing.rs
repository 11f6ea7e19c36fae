//! In-memory table store for controller tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Error;
use crate::store::{Query, TableStore, ID_COLUMN};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Select(String),
    Insert(String, Value),
    Update(String, String, Value),
    Delete(String, String),
    Count(String),
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    failing: Mutex<HashSet<&'static str>>,
    select_delays: Mutex<VecDeque<Duration>>,
}

fn matches(row: &Value, column: &str, expected: &str) -> bool {
    match row.get(column) {
        Some(Value::String(value)) => value == expected,
        Some(value) => value.to_string() == expected,
        None => false,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => std::cmp::Ordering::Equal,
    }
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed a table; rows keep the ids they carry
    pub(crate) fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.tables.lock().unwrap().insert(table.to_string(), rows);
        self
    }

    pub(crate) fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn writes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| !matches!(call, Call::Select(_) | Call::Count(_)))
            .count()
    }

    /// Make every call of this kind ("select", "insert", ...) fail
    pub(crate) fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub(crate) fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Hold the next select for `delay` after taking its snapshot
    pub(crate) fn delay_next_select(&self, delay: Duration) {
        self.select_delays.lock().unwrap().push_back(delay);
    }

    fn record(&self, call: Call, op: &'static str) -> Result<(), Error> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(op) {
            return Err(Error::database(500, format!("{} failed", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, Error> {
        let outcome = self.record(Call::Select(table.to_string()), "select");

        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|filter| matches(row, &filter.column, &filter.value))
            })
            .collect();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let delay = self.select_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        outcome.map(|_| rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<(), Error> {
        self.record(Call::Insert(table.to_string(), row.clone()), "insert")?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(fields) = row.as_object_mut() {
            fields.insert(ID_COLUMN.to_string(), json!(format!("row-{}", id)));
            fields
                .entry("created_at")
                .or_insert_with(|| json!(format!("2024-01-01T00:00:{:02}+00:00", id % 60)));
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), Error> {
        self.record(
            Call::Update(table.to_string(), id.to_string(), fields.clone()),
            "update",
        )?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| matches(row, ID_COLUMN, id)))
        {
            if let (Some(target), Some(fields)) = (row.as_object_mut(), fields.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), Error> {
        self.record(Call::Delete(table.to_string(), id.to_string()), "delete")?;
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|row| !matches(row, ID_COLUMN, id));
        }
        Ok(())
    }

    async fn count(&self, table: &str) -> Result<u64, Error> {
        self.record(Call::Count(table.to_string()), "count")?;
        Ok(self.rows(table).len() as u64)
    }
}
