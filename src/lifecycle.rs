use crate::context::Context;
use crate::error::Result;
use crate::module::AuthModule;
use crate::subject::Subject;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Value produced by a constructed resource.
pub type ResourceValue = Box<dyn Any + Send + Sync>;

/// Per-context resource with paired construct and destroy steps.
///
/// Constructed values are handed to the host; `destroy` runs when the
/// context is torn down and receives the constructed value back.
#[async_trait]
pub trait Resource: Send + Sync {
    async fn construct(&self, ctx: &Arc<dyn Context>) -> Result<ResourceValue>;

    async fn destroy(&self, _ctx: &Arc<dyn Context>, _value: ResourceValue) -> Result<()> {
        Ok(())
    }
}

/// Host registry the module attaches its resources to.
pub trait Lifecycle {
    fn register(&mut self, name: &str, resource: Box<dyn Resource>);
}

impl AuthModule {
    /// Registers this module's per-context resources with a host.
    ///
    /// Three resources are registered: the member name (default `"actor"`)
    /// yields the resolved actor and writes changes back on destroy,
    /// `"permits"` yields a [`Permits`] handle, and `"persist_<member>"`
    /// yields a [`PersistActor`] handle.
    pub fn attach(self: Arc<Self>, lifecycle: &mut dyn Lifecycle) {
        let persist_name = format!("persist_{}", self.member());
        lifecycle.register(
            self.member(),
            Box::new(ActorResource {
                module: Arc::clone(&self),
            }),
        );
        lifecycle.register(
            "permits",
            Box::new(PermitsResource {
                module: Arc::clone(&self),
            }),
        );
        lifecycle.register(&persist_name, Box::new(PersistResource { module: self }));
    }
}

struct ActorResource {
    module: Arc<AuthModule>,
}

#[async_trait]
impl Resource for ActorResource {
    async fn construct(&self, ctx: &Arc<dyn Context>) -> Result<ResourceValue> {
        let actor = self.module.actor(ctx.as_ref()).await?;
        Ok(Box::new(actor))
    }

    async fn destroy(&self, ctx: &Arc<dyn Context>, _value: ResourceValue) -> Result<()> {
        self.module.finish(ctx.as_ref()).await
    }
}

struct PermitsResource {
    module: Arc<AuthModule>,
}

#[async_trait]
impl Resource for PermitsResource {
    async fn construct(&self, ctx: &Arc<dyn Context>) -> Result<ResourceValue> {
        Ok(Box::new(Permits {
            module: Arc::clone(&self.module),
            ctx: Arc::clone(ctx),
        }))
    }
}

struct PersistResource {
    module: Arc<AuthModule>,
}

#[async_trait]
impl Resource for PersistResource {
    async fn construct(&self, ctx: &Arc<dyn Context>) -> Result<ResourceValue> {
        Ok(Box::new(PersistActor {
            module: Arc::clone(&self.module),
            ctx: Arc::clone(ctx),
        }))
    }
}

/// Context-bound authorization handle.
pub struct Permits {
    module: Arc<AuthModule>,
    ctx: Arc<dyn Context>,
}

impl Permits {
    pub async fn call(&self, operation: &str, subjects: &[&(dyn Subject + 'static)]) -> Result<bool> {
        self.module
            .permits(self.ctx.as_ref(), operation, subjects)
            .await
    }

    pub async fn check(&self, operation: &str, subjects: &[&(dyn Subject + 'static)]) -> Result<()> {
        self.module
            .check(self.ctx.as_ref(), operation, subjects)
            .await
    }
}

impl fmt::Debug for Permits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permits").finish_non_exhaustive()
    }
}

/// Context-bound handle that writes the actor through the chain.
pub struct PersistActor {
    module: Arc<AuthModule>,
    ctx: Arc<dyn Context>,
}

impl PersistActor {
    pub async fn call(&self) -> Result<()> {
        self.module.persist(self.ctx.as_ref()).await
    }
}

impl fmt::Debug for PersistActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistActor").finish_non_exhaustive()
    }
}
