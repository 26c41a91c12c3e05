/*
Remote Table Port

Output port for the hosted data platform. The platform exposes every collection
as a table that can be queried, inserted into, updated and deleted from with
simple column filters. Adapters implement this trait for a concrete backend
(the REST endpoint in production, an in-memory store in tests).

Rows are exchanged as JSON objects keyed by column name.
*/

use async_trait::async_trait;
use serde_json::{Map, Value};

/// A single table row, keyed by column name
pub type Row = Map<String, Value>;

/// Result type for table port operations
pub type TablePortResult<T> = Result<T, TablePortError>;

/// Errors reported by the data platform
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TablePortError {
    #[error("No rows matched in table {0}")]
    NotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Backend rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Filter comparison
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq(Value),
    In(Vec<Value>),
}

/// Column filter; all filters of a request must match
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Eq(value.into()),
        }
    }

    pub fn in_list<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::In(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Evaluate the filter against a row. A missing column reads as null.
    pub fn matches(&self, row: &Row) -> bool {
        let actual = row.get(&self.column).unwrap_or(&Value::Null);
        match &self.op {
            FilterOp::Eq(expected) => actual == expected,
            FilterOp::In(candidates) => candidates.iter().any(|c| c == actual),
        }
    }
}

/// Descending sort on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
}

impl OrderBy {
    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

/// Read request against a table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
    /// Columns to return; empty means all
    pub columns: Vec<String>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

/// Generic data-access port over the hosted platform
#[async_trait]
pub trait RemoteTablePort: Send + Sync {
    /// Read rows matching the query
    async fn query(&self, table: &str, query: TableQuery) -> TablePortResult<Vec<Row>>;

    /// Insert one record and return it as stored
    async fn insert(&self, table: &str, record: Row) -> TablePortResult<Row>;

    /// Apply `patch` to every matching row and return the updated rows
    async fn update(&self, table: &str, filters: Vec<Filter>, patch: Row) -> TablePortResult<Vec<Row>>;

    /// Delete every matching row; `NotFound` when nothing matched
    async fn delete(&self, table: &str, filters: Vec<Filter>) -> TablePortResult<()>;
}
