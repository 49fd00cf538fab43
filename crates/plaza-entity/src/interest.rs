//! Interest entity models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::join::one_or_many;

/// An interest (tag) a profile can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    /// Unique interest identifier.
    pub interest_id: Uuid,
    /// Display name.
    pub name: String,
    /// Icon identifier.
    #[serde(default)]
    pub icon: Option<String>,
}

/// A profile↔interest join row with its embedded interest.
///
/// The joined `interest` arrives in the same inconsistent object-or-array
/// shape as post/comment authors and is normalized identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInterestRow {
    /// The joined interest id.
    pub interest_id: Uuid,
    /// The embedded interest record.
    #[serde(default, deserialize_with = "one_or_many")]
    pub interest: Option<Interest>,
}
