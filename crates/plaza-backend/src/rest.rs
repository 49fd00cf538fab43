//! REST adapter for the relational read/write path.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use plaza_core::config::backend::BackendConfig;
use plaza_core::error::AppError;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Filter, Select};

use crate::http::{build_client, error_message, transport_error};

/// Table client over the backend's PostgREST-style surface.
///
/// Filters render as `column=eq.value` query parameters, embedded joins ride
/// in the `select` parameter, and writes ask for `return=representation` so
/// the written row comes back joined.
#[derive(Debug, Clone)]
pub struct RestTableClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl RestTableClient {
    /// Creates a table client from the backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        Ok(Self {
            http: build_client(config)?,
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.base_url, table))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    fn apply_query(builder: RequestBuilder, query: &Select) -> RequestBuilder {
        let mut params: Vec<(String, String)> =
            vec![("select".to_string(), query.columns.clone())];
        for filter in &query.filters {
            params.push((filter.column.clone(), format!("eq.{}", filter.value)));
        }
        if let Some(order) = &query.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        builder.query(&params)
    }

    fn apply_filters(builder: RequestBuilder, filters: &[Filter]) -> RequestBuilder {
        let params: Vec<(String, String)> = filters
            .iter()
            .map(|f| (f.column.clone(), format!("eq.{}", f.value)))
            .collect();
        builder.query(&params)
    }

    async fn rows(&self, builder: RequestBuilder) -> Result<Vec<Value>, AppError> {
        let response = builder.send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        let rows: Vec<Value> = response.json().await.map_err(transport_error)?;
        Ok(rows)
    }
}

async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    debug!(%status, %message, "Backend rejected request");
    Err(match status {
        StatusCode::CONFLICT => AppError::conflict(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::authentication(message),
        StatusCode::NOT_FOUND => AppError::not_found(message),
        _ if message.contains("duplicate key") => AppError::conflict(message),
        _ => AppError::network(format!("backend returned {status}: {message}")),
    })
}

#[async_trait]
impl TableClient for RestTableClient {
    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Value>, AppError> {
        let builder = Self::apply_query(self.request(Method::GET, table), query);
        self.rows(builder).await
    }

    async fn select_one(&self, table: &str, query: &Select) -> Result<Value, AppError> {
        let mut probe = query.clone();
        probe.limit = Some(2);
        let mut rows = self.select(table, &probe).await?;
        match rows.len() {
            0 => Err(AppError::not_found(format!("no matching row in {table}"))),
            1 => Ok(rows.remove(0)),
            _ => Err(AppError::internal(format!(
                "expected a single row in {table}, got several"
            ))),
        }
    }

    async fn select_maybe(&self, table: &str, query: &Select) -> Result<Option<Value>, AppError> {
        let mut probe = query.clone();
        probe.limit = Some(1);
        let mut rows = self.select(table, &probe).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    async fn insert(
        &self,
        table: &str,
        row: &Value,
        returning: Option<&str>,
    ) -> Result<Value, AppError> {
        let mut inserted = self
            .insert_many(table, std::slice::from_ref(row), returning)
            .await?;
        inserted
            .pop()
            .ok_or_else(|| AppError::internal("insert returned no representation"))
    }

    async fn insert_many(
        &self,
        table: &str,
        rows: &[Value],
        returning: Option<&str>,
    ) -> Result<Vec<Value>, AppError> {
        let mut builder = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(rows);
        if let Some(columns) = returning {
            builder = builder.query(&[("select", columns)]);
        }
        self.rows(builder).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &Value,
        returning: Option<&str>,
    ) -> Result<Value, AppError> {
        let mut builder = Self::apply_filters(self.request(Method::PATCH, table), filters)
            .header("Prefer", "return=representation")
            .json(patch);
        if let Some(columns) = returning {
            builder = builder.query(&[("select", columns)]);
        }
        let mut rows = self.rows(builder).await?;
        if rows.is_empty() {
            return Err(AppError::not_found(format!("no matching row in {table}")));
        }
        Ok(rows.remove(0))
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), AppError> {
        let builder = Self::apply_filters(self.request(Method::DELETE, table), filters);
        let response = builder.send().await.map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}
