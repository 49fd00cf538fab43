//! Relational read/write path trait.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::query::{Filter, Select};

/// Trait for the backend's keyed CRUD and filtered/ordered query surface.
///
/// Rows cross this boundary as JSON values; typed decoding (including the
/// author-join shape normalization) happens in the entity layer. The
/// `returning` clause on writes requests a joined representation of the
/// written row.
#[async_trait]
pub trait TableClient: Send + Sync + fmt::Debug + 'static {
    /// Runs a select and returns all matching rows.
    async fn select(&self, table: &str, query: &Select) -> AppResult<Vec<Value>>;

    /// Runs a select expected to match exactly one row.
    ///
    /// Zero rows is a `NotFound` error.
    async fn select_one(&self, table: &str, query: &Select) -> AppResult<Value>;

    /// Runs a select matching at most one row.
    async fn select_maybe(&self, table: &str, query: &Select) -> AppResult<Option<Value>>;

    /// Inserts a row and returns its representation.
    ///
    /// Duplicate-key rejections map to a `Conflict` error so callers can
    /// apply their recovery policies.
    async fn insert(&self, table: &str, row: &Value, returning: Option<&str>) -> AppResult<Value>;

    /// Inserts several rows and returns their representations.
    async fn insert_many(
        &self,
        table: &str,
        rows: &[Value],
        returning: Option<&str>,
    ) -> AppResult<Vec<Value>>;

    /// Applies a patch to all rows matching the filters; returns the first
    /// updated row's representation.
    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &Value,
        returning: Option<&str>,
    ) -> AppResult<Value>;

    /// Deletes all rows matching the filters.
    async fn delete(&self, table: &str, filters: &[Filter]) -> AppResult<()>;
}
