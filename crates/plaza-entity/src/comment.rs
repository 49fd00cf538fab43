//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::join::one_or_many;
use crate::profile::Profile;

/// A comment row with its embedded author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier.
    pub comment_id: Uuid,
    /// The commented post.
    pub post_id: Uuid,
    /// The authoring profile's id.
    pub profile_id: Uuid,
    /// Comment body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Embedded author sub-record, normalized to a single object. Absent on
    /// raw push payloads that carry no joins.
    #[serde(default, deserialize_with = "one_or_many")]
    pub author: Option<Profile>,
}
