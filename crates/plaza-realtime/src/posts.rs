//! Post stream subscription.

use plaza_core::error::AppError;
use plaza_core::events::change::EntityKind;
use plaza_entity::post::Post;
use plaza_service::posts::{POSTS_TABLE, POST_SELECT};

use crate::bridge::{ChangeBridge, FeedCallbacks, StreamSpec};
use crate::subscription::ChangeSubscription;

impl ChangeBridge {
    /// Subscribes to the unscoped posts stream.
    ///
    /// Inserted and updated posts are delivered enriched with their author
    /// sub-record and joined likes (the same shape the initial fetch
    /// returns); deletes deliver only the post id.
    pub async fn subscribe_posts(
        &self,
        callbacks: FeedCallbacks<Post>,
    ) -> Result<ChangeSubscription, AppError> {
        self.subscribe_stream(
            StreamSpec {
                kind: EntityKind::Post,
                table: POSTS_TABLE,
                pk_column: "post_id",
                select: POST_SELECT,
                filter: None,
            },
            callbacks,
        )
        .await
    }
}
