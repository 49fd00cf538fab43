//! Profile entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile row.
///
/// The profile id is the auth identity's id; the row is created by the
/// client on first login (or registration) via the upsert recovery path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique profile identifier (same as the auth identity id).
    pub profile_id: Uuid,
    /// Account email.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Unique handle used for mentions and profile URLs.
    pub username: String,
    /// Public URL of the profile picture, if set.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Whether the profile has moderator privileges.
    #[serde(default)]
    pub is_admin: bool,
}

impl Profile {
    /// Display name: first and last name joined, falling back to the
    /// username when both are empty.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// A partial profile update (PATCH semantics: absent fields are untouched).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New profile picture URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
