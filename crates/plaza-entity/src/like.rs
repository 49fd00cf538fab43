//! Like entity models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A like row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    /// Unique like identifier.
    pub like_id: Uuid,
    /// The liked post.
    pub post_id: Uuid,
    /// The liking profile.
    pub profile_id: Uuid,
}

/// The projection of a like embedded in a post row.
///
/// Only the pieces needed to derive the aggregate count and the
/// has-the-viewer-liked flag are joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRef {
    /// Unique like identifier.
    pub like_id: Uuid,
    /// The liking profile.
    pub profile_id: Uuid,
}
