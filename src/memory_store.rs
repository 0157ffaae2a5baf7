use crate::actor::ActorRef;
use crate::store::{ActorRecord, ActorStore};
use crate::types::ActorId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory actor store for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct MemoryActorStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    by_id: RwLock<HashMap<ActorId, ActorRef>>,
    by_username: RwLock<HashMap<String, ActorRecord>>,
}

impl MemoryActorStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor retrievable by id.
    pub fn add_actor(&self, actor: ActorRef) {
        let mut guard = self.inner.by_id.write().expect("poisoned lock");
        guard.insert(actor.id(), actor);
    }

    /// Adds login credentials resolving to an actor.
    ///
    /// The actor also becomes retrievable by id, so a credential login
    /// followed by a session reload works against one store.
    pub fn add_credentials(
        &self,
        username: impl Into<String>,
        secret: impl Into<String>,
        actor: ActorRef,
    ) {
        self.add_actor(Arc::clone(&actor));
        let mut guard = self.inner.by_username.write().expect("poisoned lock");
        guard.insert(
            username.into(),
            ActorRecord {
                actor,
                secret: secret.into(),
            },
        );
    }
}

#[async_trait]
impl ActorStore for MemoryActorStore {
    async fn lookup_by_id(
        &self,
        id: ActorId,
    ) -> std::result::Result<Option<ActorRef>, crate::StoreError> {
        let guard = self.inner.by_id.read().expect("poisoned lock");
        Ok(guard.get(&id).cloned())
    }

    async fn lookup_by_username(
        &self,
        username: &str,
    ) -> std::result::Result<Option<ActorRecord>, crate::StoreError> {
        let guard = self.inner.by_username.read().expect("poisoned lock");
        Ok(guard.get(username).cloned())
    }
}
