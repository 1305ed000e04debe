//! Persistent session identifier.

use std::sync::{Arc, Mutex};

use parley_common::SessionId;
use tracing::{debug, info, warn};

use crate::lock;
use crate::storage::KeyValueStore;

/// Storage key under which the identifier is kept.
pub const DEFAULT_STORAGE_KEY: &str = "sessionId";

/// Owns the active `SessionId` and its persisted copy.
///
/// The first `load()` reads storage; later calls return the cached value.
/// Storage failures never surface: the identifier then lives in memory for
/// the rest of the process.
pub struct SessionIdentity {
    store: Arc<dyn KeyValueStore>,
    key: String,
    current: Mutex<Option<SessionId>>,
}

impl SessionIdentity {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            current: Mutex::new(None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Return the active identifier, reading or creating it on first use.
    pub fn load(&self) -> SessionId {
        let mut current = lock(&self.current);
        if let Some(id) = current.as_ref() {
            return id.clone();
        }

        let id = match self.store.get(&self.key) {
            Ok(Some(raw)) => match SessionId::parse(&raw) {
                Some(id) => {
                    debug!(session = %id, "restored session id");
                    id
                }
                None => {
                    warn!(key = %self.key, "stored session id is malformed, generating a new one");
                    self.generate_and_persist()
                }
            },
            Ok(None) => self.generate_and_persist(),
            Err(e) => {
                warn!(error = %e, "session storage unavailable, keeping id in memory");
                SessionId::generate()
            }
        };

        *current = Some(id.clone());
        id
    }

    /// Replace the active identifier with a fresh one.
    pub fn renew(&self) -> SessionId {
        let id = self.generate_and_persist();
        *lock(&self.current) = Some(id.clone());
        info!(session = %id, "session renewed");
        id
    }

    /// The cached identifier, if `load()` or `renew()` has run.
    pub fn current(&self) -> Option<SessionId> {
        lock(&self.current).clone()
    }

    fn generate_and_persist(&self) -> SessionId {
        let id = SessionId::generate();
        if let Err(e) = self.store.set(&self.key, id.as_str()) {
            warn!(session = %id, error = %e, "failed to persist session id, keeping it in memory");
        }
        id
    }
}

impl std::fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("key", &self.key)
            .field("current", &self.current())
            .finish()
    }
}
