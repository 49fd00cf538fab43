//! Moderation reports.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::Select;
use plaza_entity::report::Report;

/// Reports table name.
pub const REPORTS_TABLE: &str = "reports";

/// Service for filing moderation reports.
#[derive(Debug, Clone)]
pub struct ReportService {
    tables: Arc<dyn TableClient>,
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(tables: Arc<dyn TableClient>) -> Self {
        Self { tables }
    }

    /// Files a report against a post.
    pub async fn report_post(
        &self,
        post_id: Uuid,
        reporter_id: Uuid,
        reason: &str,
    ) -> Result<Report, AppError> {
        let row = serde_json::json!({
            "post_id": post_id,
            "reporter_id": reporter_id,
            "reason": reason,
            "kind": "post",
        });
        let created = self.tables.insert(REPORTS_TABLE, &row, Some("*")).await?;
        let report: Report = serde_json::from_value(created)?;
        info!(report_id = %report.report_id, post_id = %post_id, "Post reported");
        Ok(report)
    }

    /// Files a report against a user.
    pub async fn report_user(
        &self,
        reported_profile_id: Uuid,
        reporter_id: Uuid,
        reason: &str,
    ) -> Result<Report, AppError> {
        let row = serde_json::json!({
            "reported_profile_id": reported_profile_id,
            "reporter_id": reporter_id,
            "reason": reason,
            "kind": "user",
        });
        let created = self.tables.insert(REPORTS_TABLE, &row, Some("*")).await?;
        let report: Report = serde_json::from_value(created)?;
        info!(report_id = %report.report_id, reported = %reported_profile_id, "User reported");
        Ok(report)
    }

    /// Whether the profile has moderator privileges. Failures fail closed.
    pub async fn is_admin(&self, profile_id: Uuid) -> bool {
        let query = Select::new("is_admin").filter("profile_id", profile_id);
        match self.tables.select_one("profiles", &query).await {
            Ok(row) => row
                .get("is_admin")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Err(e) => {
                warn!(profile_id = %profile_id, error = %e, "Admin check failed");
                false
            }
        }
    }
}
