use crate::actor::ActorRef;
use crate::error::StoreError;
use crate::types::ActorId;
use async_trait::async_trait;

/// Credential record returned by a username lookup.
#[derive(Debug, Clone)]
pub struct ActorRecord {
    /// The stored actor.
    pub actor: ActorRef,
    /// The stored secret compared against a submitted password.
    pub secret: String,
}

/// Store interface for actor lookup during identity resolution.
#[async_trait]
pub trait ActorStore: Send + Sync {
    /// Returns the actor stored under an id, if any.
    async fn lookup_by_id(&self, id: ActorId) -> std::result::Result<Option<ActorRef>, StoreError>;

    /// Returns the actor and stored secret for a username, if any.
    async fn lookup_by_username(
        &self,
        username: &str,
    ) -> std::result::Result<Option<ActorRecord>, StoreError>;
}
