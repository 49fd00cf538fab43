//! Post entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::join::one_or_many;
use crate::like::LikeRef;
use crate::profile::Profile;

/// A post row with its embedded author and joined likes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier.
    pub post_id: Uuid,
    /// The authoring profile's id.
    pub profile_id: Uuid,
    /// Post title.
    pub title: String,
    /// Post body.
    #[serde(default)]
    pub body: String,
    /// Attached image URL, if any.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Embedded author sub-record, normalized to a single object. Absent on
    /// raw push payloads that carry no joins.
    #[serde(default, deserialize_with = "one_or_many")]
    pub author: Option<Profile>,
    /// Joined likes used to derive aggregate counts.
    #[serde(default)]
    pub likes: Vec<LikeRef>,
}

impl Post {
    /// Number of likes on this post.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Whether the given profile has liked this post.
    pub fn liked_by(&self, profile_id: Uuid) -> bool {
        self.likes.iter().any(|l| l.profile_id == profile_id)
    }
}

/// Data required to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    /// The authoring profile's id.
    pub profile_id: Uuid,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Attached image URL, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
