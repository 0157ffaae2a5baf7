use crate::actor::{Actor, ActorCodec, ActorRef};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::store::ActorStore;
use crate::types::ActorId;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Default session key under which the actor is stored.
pub const DEFAULT_SESSION_KEY: &str = "actor";

/// One link in the identity resolution chain.
///
/// Each link owns its successor. `retrieve` answers or delegates down the
/// chain; `store` records the actor in this link's storage and always
/// forwards, so every link observes the write. Chains are built once and
/// shared read-only.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolves the actor for a context.
    async fn retrieve(&self, ctx: &dyn Context) -> Result<Option<ActorRef>>;

    /// Records the actor, or clears it when `None`.
    async fn store(&self, ctx: &dyn Context, actor: Option<&dyn Actor>) -> Result<()>;
}

/// Terminal chain link that resolves nothing and stores nowhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuthenticator;

#[async_trait]
impl Authenticator for NullAuthenticator {
    async fn retrieve(&self, _ctx: &dyn Context) -> Result<Option<ActorRef>> {
        Ok(None)
    }

    async fn store(&self, _ctx: &dyn Context, _actor: Option<&dyn Actor>) -> Result<()> {
        Ok(())
    }
}

enum SessionFormat {
    Id { store: Arc<dyn ActorStore> },
    Blob { codec: Arc<dyn ActorCodec> },
}

/// Chain link backed by the context's session storage.
///
/// In id mode the session holds the actor id and the actor is reloaded from
/// an [`ActorStore`]; in codec mode the session holds an opaque value
/// produced by an [`ActorCodec`]. A present session key means this link owns
/// the answer: a stale or unparseable id resolves to no actor without
/// consulting the rest of the chain.
pub struct SessionAuthenticator {
    session_key: String,
    format: SessionFormat,
    next: Box<dyn Authenticator>,
}

impl SessionAuthenticator {
    /// Creates an id-mode link reloading actors from `store`.
    pub fn with_store(store: Arc<dyn ActorStore>, next: Box<dyn Authenticator>) -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            format: SessionFormat::Id { store },
            next,
        }
    }

    /// Creates a codec-mode link storing encoded actors.
    pub fn with_codec(codec: Arc<dyn ActorCodec>, next: Box<dyn Authenticator>) -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            format: SessionFormat::Blob { codec },
            next,
        }
    }

    /// Sets the session key (default [`DEFAULT_SESSION_KEY`]).
    pub fn session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn retrieve(&self, ctx: &dyn Context) -> Result<Option<ActorRef>> {
        let Some(stored) = ctx.session().get(&self.session_key) else {
            return self.next.retrieve(ctx).await;
        };
        match &self.format {
            SessionFormat::Id { store } => {
                let Ok(id) = ActorId::new(&stored) else {
                    return Ok(None);
                };
                store.lookup_by_id(id).await.map_err(Error::Store)
            }
            SessionFormat::Blob { codec } => codec.decode(&stored).map(Some),
        }
    }

    async fn store(&self, ctx: &dyn Context, actor: Option<&dyn Actor>) -> Result<()> {
        match actor {
            Some(actor) => {
                let value = match &self.format {
                    SessionFormat::Id { .. } => actor.id().to_string(),
                    SessionFormat::Blob { codec } => codec.encode(actor)?,
                };
                ctx.session().set(&self.session_key, value);
            }
            None => ctx.session().remove(&self.session_key),
        }
        self.next.store(ctx, actor).await
    }
}

impl fmt::Debug for SessionAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionAuthenticator")
            .field("session_key", &self.session_key)
            .finish_non_exhaustive()
    }
}
