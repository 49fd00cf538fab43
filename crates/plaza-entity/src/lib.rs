//! # plaza-entity
//!
//! Domain entity models for Plaza: profiles, posts, comments, likes,
//! interests, reports, and the client-local session record. Entities decode
//! directly from backend rows; joined sub-records are normalized at the
//! serde boundary (see [`join`]).

pub mod comment;
pub mod interest;
pub mod join;
pub mod like;
pub mod post;
pub mod profile;
pub mod report;
pub mod session;

pub use comment::Comment;
pub use interest::{Interest, ProfileInterestRow};
pub use like::{Like, LikeRef};
pub use post::{NewPost, Post};
pub use profile::{Profile, ProfileUpdate};
pub use report::{Report, ReportKind};
pub use session::{Session, SessionUpdate};
