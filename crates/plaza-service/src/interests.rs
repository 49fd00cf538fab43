//! Interest catalogue and per-profile interest sets.

use std::sync::Arc;

use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Filter, Order, Select};
use plaza_entity::interest::{Interest, ProfileInterestRow};

/// Interests catalogue table name.
pub const INTERESTS_TABLE: &str = "interests";

/// Profile↔interest join table name.
pub const PROFILE_INTERESTS_TABLE: &str = "profile_interests";

/// Join select clause embedding the interest record; the embedded shape is
/// normalized like every other join.
pub const PROFILE_INTEREST_SELECT: &str =
    "interest_id, interest:interests(interest_id,name,icon)";

/// Service for interests.
#[derive(Debug, Clone)]
pub struct InterestService {
    tables: Arc<dyn TableClient>,
}

impl InterestService {
    /// Creates a new interest service.
    pub fn new(tables: Arc<dyn TableClient>) -> Self {
        Self { tables }
    }

    /// Fetches the whole catalogue, ordered by name.
    pub async fn fetch_all(&self) -> Result<Vec<Interest>, AppError> {
        let rows = self
            .tables
            .select(INTERESTS_TABLE, &Select::all().order_by(Order::asc("name")))
            .await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }

    /// Fetches the interests attached to a profile.
    pub async fn fetch_for_profile(&self, profile_id: Uuid) -> Result<Vec<Interest>, AppError> {
        let rows = self
            .tables
            .select(
                PROFILE_INTERESTS_TABLE,
                &Select::new(PROFILE_INTEREST_SELECT).filter("profile_id", profile_id),
            )
            .await?;
        let joined: Vec<ProfileInterestRow> = rows
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect::<Result<_, _>>()?;
        Ok(joined.into_iter().filter_map(|r| r.interest).collect())
    }

    /// Replaces a profile's interest set with the given ids.
    pub async fn replace_for_profile(
        &self,
        profile_id: Uuid,
        interest_ids: &[Uuid],
    ) -> Result<(), AppError> {
        self.tables
            .delete(
                PROFILE_INTERESTS_TABLE,
                &[Filter::eq("profile_id", profile_id)],
            )
            .await?;

        if interest_ids.is_empty() {
            return Ok(());
        }

        let rows: Vec<serde_json::Value> = interest_ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "profile_id": profile_id,
                    "interest_id": id,
                })
            })
            .collect();
        self.tables
            .insert_many(PROFILE_INTERESTS_TABLE, &rows, None)
            .await?;
        Ok(())
    }
}
