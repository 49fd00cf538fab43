//! Collaborator traits for the hosted backend service.
//!
//! The backend (auth provider, relational tables, change feeds, object
//! storage) is an external collaborator; these traits are its only surface.
//! Concrete adapters live in `plaza-backend`, in-memory fakes in the test
//! suites.

pub mod auth;
pub mod changefeed;
pub mod storage;
pub mod table;

pub use auth::{AuthEventHandler, AuthProvider, AuthSession, Credentials, EventSubscription,
               SignUpOutcome};
pub use changefeed::{ChangeFeed, ChangeHandler, FeedHandle};
pub use storage::ObjectStore;
pub use table::TableClient;
