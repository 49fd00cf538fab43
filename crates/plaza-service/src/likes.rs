//! Like/unlike operations.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Filter, Select};
use plaza_entity::like::Like;

/// Likes table name.
pub const LIKES_TABLE: &str = "likes";

/// Service for liking and unliking posts.
#[derive(Debug, Clone)]
pub struct LikeService {
    tables: Arc<dyn TableClient>,
}

impl LikeService {
    /// Creates a new like service.
    pub fn new(tables: Arc<dyn TableClient>) -> Self {
        Self { tables }
    }

    /// Likes a post.
    ///
    /// A duplicate-key conflict means the like already exists; that is not a
    /// failure and yields `None`.
    pub async fn like(&self, post_id: Uuid, profile_id: Uuid) -> Result<Option<Like>, AppError> {
        let row = serde_json::json!({
            "post_id": post_id,
            "profile_id": profile_id,
        });
        match self.tables.insert(LIKES_TABLE, &row, Some("*")).await {
            Ok(created) => Ok(Some(serde_json::from_value(created)?)),
            Err(e) if e.is_conflict() => {
                debug!(post_id = %post_id, profile_id = %profile_id, "Like already exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Removes a like.
    pub async fn unlike(&self, post_id: Uuid, profile_id: Uuid) -> Result<(), AppError> {
        self.tables
            .delete(
                LIKES_TABLE,
                &[
                    Filter::eq("post_id", post_id),
                    Filter::eq("profile_id", profile_id),
                ],
            )
            .await
    }

    /// Whether the profile has liked the post.
    pub async fn has_liked(&self, post_id: Uuid, profile_id: Uuid) -> Result<bool, AppError> {
        let rows = self
            .tables
            .select(
                LIKES_TABLE,
                &Select::new("like_id")
                    .filter("post_id", post_id)
                    .filter("profile_id", profile_id)
                    .limit(1),
            )
            .await?;
        Ok(!rows.is_empty())
    }
}
