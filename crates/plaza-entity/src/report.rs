//! Report entity models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// A reported post.
    Post,
    /// A reported user.
    User,
}

/// A moderation report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Unique report identifier.
    pub report_id: Uuid,
    /// The reported post, for post reports.
    #[serde(default)]
    pub post_id: Option<Uuid>,
    /// The reported profile, for user reports.
    #[serde(default)]
    pub reported_profile_id: Option<Uuid>,
    /// Who filed the report.
    pub reporter_id: Uuid,
    /// Reason given by the reporter.
    pub reason: String,
    /// Report kind.
    pub kind: ReportKind,
}
