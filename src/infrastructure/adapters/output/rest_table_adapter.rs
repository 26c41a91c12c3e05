/*
REST Table Adapter

RemoteTablePort over the hosted platform's REST endpoint (PostgREST dialect):

    GET    {url}/rest/v1/{table}?col=eq.value&order=created_at.desc&limit=1
    POST   {url}/rest/v1/{table}            body: record
    PATCH  {url}/rest/v1/{table}?col=eq.v   body: patch
    DELETE {url}/rest/v1/{table}?col=eq.v

Every request carries the project API key both as `apikey` and as a bearer
token, and asks for `return=representation` so writes echo the affected rows.
*/

use crate::application::ports::output::table_port::{
    Filter, FilterOp, RemoteTablePort, Row, TablePortError, TablePortResult, TableQuery,
};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestTableConfig {
    pub base_url: String,
    pub api_key: String,
    pub schema: String,
    pub timeout_seconds: u64,
}

impl Default for RestTableConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            schema: "public".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestTableAdapter {
    config: RestTableConfig,
    base: Url,
    client: Client,
}

impl RestTableAdapter {
    pub fn new(config: RestTableConfig) -> TablePortResult<Self> {
        let mut base = Url::parse(&config.base_url)
            .map_err(|e| TablePortError::Request(format!("Invalid backend url {}: {}", config.base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TablePortError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, base, client })
    }

    pub fn table_url(&self, table: &str) -> TablePortResult<Url> {
        self.base
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| TablePortError::Request(format!("Invalid table name {}: {}", table, e)))
    }

    fn request(&self, method: Method, table: &str) -> TablePortResult<RequestBuilder> {
        let url = self.table_url(table)?;
        debug!("{} {}", method, url);

        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Accept-Profile", &self.config.schema)
            .header("Content-Profile", &self.config.schema)
            .header("Prefer", "return=representation"))
    }
}

/// Query-string pairs for a read request
pub fn query_params(query: &TableQuery) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if !query.columns.is_empty() {
        params.push(("select".to_string(), query.columns.join(",")));
    }
    params.extend(filter_params(&query.filters));
    if let Some(order) = &query.order {
        params.push(("order".to_string(), format!("{}.desc", order.column)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

pub fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| {
            let expression = match &filter.op {
                FilterOp::Eq(Value::Null) => "is.null".to_string(),
                FilterOp::Eq(value) => format!("eq.{}", encode_value(value)),
                FilterOp::In(values) => {
                    let items: Vec<String> = values.iter().map(encode_list_item).collect();
                    format!("in.({})", items.join(","))
                }
            };
            (filter.column.clone(), expression)
        })
        .collect()
}

fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

// List items containing reserved characters must be double-quoted
fn encode_list_item(value: &Value) -> String {
    let raw = encode_value(value);
    if raw.chars().any(|c| matches!(c, ',' | '(' | ')' | '"' | '\\') || c.is_whitespace()) {
        format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        raw
    }
}

fn transport_error(e: reqwest::Error) -> TablePortError {
    if e.is_connect() || e.is_timeout() {
        TablePortError::Connection(e.to_string())
    } else {
        TablePortError::Request(e.to_string())
    }
}

async fn send_for_rows(builder: RequestBuilder) -> TablePortResult<Vec<Row>> {
    let response = builder.send().await.map_err(transport_error)?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TablePortError::Rejected { status: status.as_u16(), body });
    }

    response
        .json::<Vec<Row>>()
        .await
        .map_err(|e| TablePortError::Decode(e.to_string()))
}

#[async_trait]
impl RemoteTablePort for RestTableAdapter {
    async fn query(&self, table: &str, query: TableQuery) -> TablePortResult<Vec<Row>> {
        let builder = self.request(Method::GET, table)?.query(&query_params(&query));
        send_for_rows(builder).await
    }

    async fn insert(&self, table: &str, record: Row) -> TablePortResult<Row> {
        let builder = self.request(Method::POST, table)?.json(&record);
        send_for_rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TablePortError::Decode(format!("Insert into {} returned no row", table)))
    }

    async fn update(&self, table: &str, filters: Vec<Filter>, patch: Row) -> TablePortResult<Vec<Row>> {
        let builder = self
            .request(Method::PATCH, table)?
            .query(&filter_params(&filters))
            .json(&patch);
        send_for_rows(builder).await
    }

    async fn delete(&self, table: &str, filters: Vec<Filter>) -> TablePortResult<()> {
        let builder = self.request(Method::DELETE, table)?.query(&filter_params(&filters));
        let removed = send_for_rows(builder).await?;
        if removed.is_empty() {
            return Err(TablePortError::NotFound(table.to_string()));
        }
        Ok(())
    }
}
