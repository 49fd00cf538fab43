//! Comment CRUD over the relational read path.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Filter, Order, Select};
use plaza_entity::comment::Comment;

/// Comments table name.
pub const COMMENTS_TABLE: &str = "comments";

/// Canonical comment select clause with the embedded author sub-record.
pub const COMMENT_SELECT: &str = "*, \
    author:profiles(profile_id,email,first_name,last_name,username,avatar_url,is_admin)";

/// CRUD service for comments.
#[derive(Debug, Clone)]
pub struct CommentService {
    tables: Arc<dyn TableClient>,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(tables: Arc<dyn TableClient>) -> Self {
        Self { tables }
    }

    /// Fetches all comments on a post, oldest first.
    pub async fn fetch_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, AppError> {
        let rows = self
            .tables
            .select(
                COMMENTS_TABLE,
                &Select::new(COMMENT_SELECT)
                    .filter("post_id", post_id)
                    .order_by(Order::asc("created_at")),
            )
            .await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    /// Creates a comment and returns its joined representation.
    ///
    /// The body is trimmed; blank bodies are rejected.
    pub async fn create(
        &self,
        post_id: Uuid,
        profile_id: Uuid,
        body: &str,
    ) -> Result<Comment, AppError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::validation("Comment body cannot be empty"));
        }

        let row = serde_json::json!({
            "post_id": post_id,
            "profile_id": profile_id,
            "body": body,
        });
        let created = self
            .tables
            .insert(COMMENTS_TABLE, &row, Some(COMMENT_SELECT))
            .await?;
        let comment: Comment = serde_json::from_value(created)?;
        info!(comment_id = %comment.comment_id, post_id = %post_id, "Comment created");
        Ok(comment)
    }

    /// Deletes a comment by key.
    pub async fn delete(&self, comment_id: Uuid) -> Result<(), AppError> {
        self.tables
            .delete(COMMENTS_TABLE, &[Filter::eq("comment_id", comment_id)])
            .await?;
        info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }
}
