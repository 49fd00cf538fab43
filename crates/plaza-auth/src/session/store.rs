//! Process-wide session state with observer fan-out.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

use plaza_entity::session::{Session, SessionUpdate};

/// Callback invoked with every session change.
pub type SessionObserver = Arc<dyn Fn(&SessionUpdate) + Send + Sync>;

struct Registry {
    next_id: u64,
    observers: Vec<(u64, SessionObserver)>,
}

/// The process-wide store of the current authenticated identity.
///
/// Exactly one session exists per store. The session and the observer
/// registry are mutated only through the store's own methods; every other
/// component requests changes through it.
///
/// Fan-out contract: every call to [`SessionStore::set_session`] invokes
/// every live observer exactly once, in registration order, synchronously,
/// before the call returns — including when the new session is value-equal
/// to the old one. Observers must not re-enter `set_session` unboundedly;
/// no cycle detection is provided.
pub struct SessionStore {
    current: Mutex<Session>,
    registry: Arc<Mutex<Registry>>,
}

impl SessionStore {
    /// Creates a store holding the anonymous session.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(Session::anonymous()),
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                observers: Vec::new(),
            })),
        })
    }

    /// Returns a snapshot of the current session. Never blocks on anything
    /// but the internal lock; never fails.
    pub fn current(&self) -> Session {
        self.current.lock().expect("session lock poisoned").clone()
    }

    /// Registers an observer and immediately replays the current session to
    /// it, so late subscribers do not miss the state they mounted into.
    ///
    /// The returned handle deregisters the observer; dropping it without
    /// calling [`SessionSubscription::unsubscribe`] leaves the observer
    /// registered for the life of the store.
    pub fn subscribe(&self, observer: SessionObserver) -> SessionSubscription {
        let id = {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let id = registry.next_id;
            registry.next_id += 1;
            registry.observers.push((id, observer.clone()));
            id
        };

        // Replay outside the registry lock so the observer may itself
        // subscribe or unsubscribe.
        let update = SessionUpdate {
            session: self.current(),
            inactivity_logout: false,
        };
        observer(&update);

        SessionSubscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Replaces the session and fans out to every registered observer, in
    /// registration order. Crate-internal: the auth bridge, the account
    /// workflows, and the inactivity monitor are the only mutators.
    pub(crate) fn set_session(&self, session: Session, inactivity_logout: bool) {
        {
            let mut current = self.current.lock().expect("session lock poisoned");
            *current = session.clone();
        }

        // Snapshot the observer list, then invoke without holding the lock.
        let observers: Vec<SessionObserver> = {
            let registry = self.registry.lock().expect("registry lock poisoned");
            registry.observers.iter().map(|(_, o)| o.clone()).collect()
        };

        debug!(
            authenticated = session.is_authenticated(),
            inactivity_logout,
            observers = observers.len(),
            "Session changed, notifying observers"
        );

        let update = SessionUpdate {
            session,
            inactivity_logout,
        };
        for observer in observers {
            observer(&update);
        }
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.registry
            .lock()
            .expect("registry lock poisoned")
            .observers
            .len()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.current())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Disposer handle for a registered session observer.
///
/// `unsubscribe` is idempotent and stops further notifications to the
/// observer. The handle only weakly references the registry, so keeping it
/// alive does not extend the store's lifetime.
#[derive(Debug)]
pub struct SessionSubscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl SessionSubscription {
    /// Deregisters the observer. Safe to call more than once.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().expect("registry lock poisoned");
            registry.observers.retain(|(oid, _)| *oid != self.id);
        }
    }
}
