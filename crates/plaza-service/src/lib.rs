//! # plaza-service
//!
//! Domain services for Plaza. Each service wraps the relational read/write
//! path (and object storage, for images) behind a typed API. Provider errors
//! on explicit user actions are surfaced; background reconciliation errors
//! are logged and recovered per the application's error policy.

pub mod comments;
pub mod images;
pub mod interests;
pub mod likes;
pub mod mentions;
pub mod posts;
pub mod profiles;
pub mod reports;

pub use comments::CommentService;
pub use images::ImageService;
pub use interests::InterestService;
pub use likes::LikeService;
pub use mentions::{MentionResolver, TextSegment};
pub use posts::PostService;
pub use profiles::ProfileService;
pub use reports::ReportService;
