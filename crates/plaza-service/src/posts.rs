//! Post CRUD over the relational read path.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Order, Select};
use plaza_entity::post::{NewPost, Post};

/// Posts table name.
pub const POSTS_TABLE: &str = "posts";

/// Canonical post select clause: every plain column, the author sub-record,
/// and the joined likes used for aggregate counts. Used by the initial
/// fetches and by the realtime bridge's enrichment fetches so records are
/// shaped identically everywhere.
pub const POST_SELECT: &str = "*, \
    author:profiles(profile_id,email,first_name,last_name,username,avatar_url,is_admin), \
    likes(like_id,profile_id)";

/// CRUD service for posts.
#[derive(Debug, Clone)]
pub struct PostService {
    /// Relational read/write path.
    tables: Arc<dyn TableClient>,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(tables: Arc<dyn TableClient>) -> Self {
        Self { tables }
    }

    /// Creates a post and returns its joined representation.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post, AppError> {
        let row = serde_json::to_value(new_post)?;
        let created = self
            .tables
            .insert(POSTS_TABLE, &row, Some(POST_SELECT))
            .await?;
        let post: Post = serde_json::from_value(created)?;
        info!(post_id = %post.post_id, profile_id = %post.profile_id, "Post created");
        Ok(post)
    }

    /// Fetches all posts, newest first.
    pub async fn fetch_all(&self) -> Result<Vec<Post>, AppError> {
        let rows = self
            .tables
            .select(
                POSTS_TABLE,
                &Select::new(POST_SELECT).order_by(Order::desc("created_at")),
            )
            .await?;
        decode_posts(rows)
    }

    /// Fetches all posts by one profile, newest first.
    pub async fn fetch_by_user(&self, profile_id: Uuid) -> Result<Vec<Post>, AppError> {
        let rows = self
            .tables
            .select(
                POSTS_TABLE,
                &Select::new(POST_SELECT)
                    .filter("profile_id", profile_id)
                    .order_by(Order::desc("created_at")),
            )
            .await?;
        decode_posts(rows)
    }

    /// Fetches a single post by key.
    pub async fn fetch_by_id(&self, post_id: Uuid) -> Result<Post, AppError> {
        let row = self
            .tables
            .select_one(
                POSTS_TABLE,
                &Select::new(POST_SELECT).filter("post_id", post_id),
            )
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Deletes a post by key.
    pub async fn delete(&self, post_id: Uuid) -> Result<(), AppError> {
        self.tables
            .delete(POSTS_TABLE, &[plaza_core::types::query::Filter::eq("post_id", post_id)])
            .await?;
        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }
}

fn decode_posts(rows: Vec<serde_json::Value>) -> Result<Vec<Post>, AppError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(AppError::from))
        .collect()
}
