//! Subscription handles with cancellation-at-delivery semantics.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use plaza_core::traits::changefeed::FeedHandle;

/// Handle to an active realtime subscription.
///
/// `unsubscribe` releases the underlying channel and stops callback
/// invocations immediately: no cancellation token reaches in-flight
/// enrichment fetches, but their results are checked against the
/// cancellation flag at the delivery boundary and discarded once the
/// subscription is gone. Safe to call any number of times; dropping the
/// handle unsubscribes as well.
pub struct ChangeSubscription {
    cancelled: Arc<AtomicBool>,
    handle: Mutex<Option<FeedHandle>>,
}

impl ChangeSubscription {
    pub(crate) fn new(handle: FeedHandle, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            cancelled,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Releases the channel and stops further deliveries. Idempotent.
    pub fn unsubscribe(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(mut handle) = self.handle.lock().expect("handle lock poisoned").take() {
            handle.release();
        }
    }

    /// Whether the subscription is still delivering.
    pub fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}
