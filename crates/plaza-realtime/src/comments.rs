//! Comment stream subscription, scoped to one post.

use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::events::change::EntityKind;
use plaza_core::types::query::Filter;
use plaza_entity::comment::Comment;
use plaza_service::comments::{COMMENTS_TABLE, COMMENT_SELECT};

use crate::bridge::{ChangeBridge, FeedCallbacks, StreamSpec};
use crate::subscription::ChangeSubscription;

impl ChangeBridge {
    /// Subscribes to the comment stream of a single post.
    pub async fn subscribe_comments(
        &self,
        post_id: Uuid,
        callbacks: FeedCallbacks<Comment>,
    ) -> Result<ChangeSubscription, AppError> {
        self.subscribe_stream(
            StreamSpec {
                kind: EntityKind::Comment,
                table: COMMENTS_TABLE,
                pk_column: "comment_id",
                select: COMMENT_SELECT,
                filter: Some(Filter::eq("post_id", post_id)),
            },
            callbacks,
        )
        .await
    }
}
