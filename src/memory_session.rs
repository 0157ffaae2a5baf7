use crate::context::Session;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory session shared across the contexts of one logical client.
///
/// Clones share storage, so a session created for a login request can back
/// later requests of the same client.
#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored values.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.inner.read().expect("poisoned lock").clone()
    }
}

impl Session for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().expect("poisoned lock").get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.inner
            .write()
            .expect("poisoned lock")
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.inner.write().expect("poisoned lock").remove(key);
    }
}
