//! Profile lookup, update, and the upsert recovery path.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Filter, Select};
use plaza_entity::profile::{Profile, ProfileUpdate};

/// Profiles table name.
pub const PROFILES_TABLE: &str = "profiles";

/// Service for profile rows.
#[derive(Debug, Clone)]
pub struct ProfileService {
    tables: Arc<dyn TableClient>,
}

impl ProfileService {
    /// Creates a new profile service.
    pub fn new(tables: Arc<dyn TableClient>) -> Self {
        Self { tables }
    }

    /// Fetches a profile by id. Missing rows are a `NotFound` error.
    pub async fn get(&self, profile_id: Uuid) -> Result<Profile, AppError> {
        let row = self
            .tables
            .select_one(
                PROFILES_TABLE,
                &Select::all().filter("profile_id", profile_id),
            )
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Applies a partial update and returns the updated profile.
    pub async fn update(
        &self,
        profile_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Profile, AppError> {
        let patch = serde_json::to_value(update)?;
        let row = self
            .tables
            .update(
                PROFILES_TABLE,
                &[Filter::eq("profile_id", profile_id)],
                &patch,
                Some("*"),
            )
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Ensures a profile row exists for the identity and returns it.
    ///
    /// An existing row is returned untouched. Otherwise a row is created
    /// with a generated unique username. If the insert loses a race and
    /// comes back as a duplicate-key conflict, the existing row is fetched
    /// and returned instead — the conflict is never surfaced.
    pub async fn upsert(
        &self,
        identity_id: Uuid,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        username: Option<&str>,
    ) -> Result<Profile, AppError> {
        match self.get(identity_id).await {
            Ok(existing) => return Ok(existing),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let email_local = email.split('@').next().unwrap_or(email);
        let username = self
            .generate_unique_username(username.unwrap_or(email_local))
            .await?;
        let row = serde_json::json!({
            "profile_id": identity_id,
            "email": email,
            "first_name": first_name.unwrap_or(email_local),
            "last_name": last_name.unwrap_or(""),
            "username": username,
            "is_admin": false,
        });

        match self.tables.insert(PROFILES_TABLE, &row, Some("*")).await {
            Ok(created) => {
                let profile: Profile = serde_json::from_value(created)?;
                info!(profile_id = %identity_id, username = %profile.username, "Profile created");
                Ok(profile)
            }
            Err(e) if e.is_conflict() => {
                warn!(profile_id = %identity_id, "Profile insert conflicted, recovering existing row");
                match self.get(identity_id).await {
                    Ok(existing) => Ok(existing),
                    // The conflicting row could not be read back; surface
                    // the original conflict rather than the read error.
                    Err(_) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Looks up a profile by its username handle.
    ///
    /// Absence is `None`, and backend failures degrade to `None` as well —
    /// mention resolution must never fail a render.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Profile>, AppError> {
        match self
            .tables
            .select_maybe(
                PROFILES_TABLE,
                &Select::all().filter("username", username),
            )
            .await
        {
            Ok(Some(row)) => Ok(Some(serde_json::from_value(row)?)),
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(username = %username, error = %e, "Username lookup failed");
                Ok(None)
            }
        }
    }

    /// Generates a username that is not yet taken, starting from a base
    /// handle and probing numeric suffixes.
    async fn generate_unique_username(&self, base: &str) -> Result<String, AppError> {
        let clean = sanitize_username(base);
        let mut candidate = clean.clone();
        let mut counter = 1u32;
        while self.username_exists(&candidate).await? {
            candidate = format!("{clean}{counter}");
            counter += 1;
        }
        Ok(candidate)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        match self
            .tables
            .select_maybe(
                PROFILES_TABLE,
                &Select::new("username").filter("username", username),
            )
            .await
        {
            Ok(found) => Ok(found.is_some()),
            Err(e) => {
                warn!(username = %username, error = %e, "Username existence check failed");
                Ok(false)
            }
        }
    }
}

/// Strips a handle down to lowercase `[a-z0-9_]`, collapsing repeated
/// underscores and trimming them from the edges. An empty result falls back
/// to `"user"`.
pub fn sanitize_username(base: &str) -> String {
    let mut out = String::with_capacity(base.len());
    let mut prev_underscore = false;
    for c in base.to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' => {
                out.push(c);
                prev_underscore = false;
            }
            '_' => {
                if !prev_underscore {
                    out.push('_');
                }
                prev_underscore = true;
            }
            _ => {}
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "user".to_string()
    } else {
        trimmed.to_string()
    }
}
