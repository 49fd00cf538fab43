//! Change-feed subscription trait.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::events::change::RawChange;
use crate::result::AppResult;
use crate::types::query::Filter;

/// Callback invoked with every raw change pushed on a feed.
pub type ChangeHandler = Arc<dyn Fn(RawChange) + Send + Sync>;

/// Handle to an active feed subscription.
///
/// Releasing the handle tears down the underlying channel and stops handler
/// invocations. [`FeedHandle::release`] is idempotent; dropping the handle
/// releases it as well.
pub struct FeedHandle {
    canceller: Option<Box<dyn FnOnce() + Send>>,
}

impl FeedHandle {
    /// Wraps the teardown action for a subscribed channel.
    pub fn new(canceller: impl FnOnce() + Send + 'static) -> Self {
        Self {
            canceller: Some(Box::new(canceller)),
        }
    }

    /// Tears down the underlying channel. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(cancel) = self.canceller.take() {
            cancel();
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for FeedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedHandle")
            .field("live", &self.canceller.is_some())
            .finish()
    }
}

/// Trait for the backend's row-change push feeds.
#[async_trait]
pub trait ChangeFeed: Send + Sync + fmt::Debug + 'static {
    /// Subscribes to changes on a table, optionally scoped by an equality
    /// filter. The handler runs for every pushed change, in delivery order.
    async fn subscribe(
        &self,
        table: &str,
        filter: Option<Filter>,
        handler: ChangeHandler,
    ) -> AppResult<FeedHandle>;
}
