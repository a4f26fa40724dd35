use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::ApiKey;

/// Shared slot holding the API key. Clones share the same slot.
///
/// Requests read the slot once when they are dispatched; later writes do not affect
/// requests already in flight.
#[derive(Debug, Clone, Default)]
pub(crate) struct CredentialStore {
    key: Arc<RwLock<String>>,
}

impl CredentialStore {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        Self {
            key: Arc::new(RwLock::new(key.into())),
        }
    }

    /// Replace the stored key unconditionally.
    pub(crate) fn set(&self, key: impl Into<String>) {
        let key = key.into();
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = key;
    }

    /// Current key, or `None` when it is unset or blank.
    pub(crate) fn snapshot(&self) -> Option<ApiKey> {
        let key = self.key.read().unwrap_or_else(PoisonError::into_inner);
        ApiKey::new(key.as_str()).ok()
    }
}
