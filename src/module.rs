use crate::actor::{Actor, ActorRef};
use crate::authenticator::{Authenticator, NullAuthenticator};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::ruleset::RuleSet;
use crate::subject::Subject;
use std::fmt;

const DEFAULT_MEMBER: &str = "actor";

/// Deferred chain link constructor.
///
/// Receives the next link and returns the assembled one, so a list of these
/// can be folded into a chain back to front.
pub type LinkBuilder = Box<dyn FnOnce(Box<dyn Authenticator>) -> Box<dyn Authenticator>>;

/// Builder for [`AuthModule`].
pub struct AuthModuleBuilder {
    ruleset: RuleSet,
    links: Vec<LinkBuilder>,
    single_link: Option<LinkBuilder>,
    member: String,
}

impl AuthModuleBuilder {
    pub fn new() -> Self {
        Self {
            ruleset: RuleSet::new(),
            links: Vec::new(),
            single_link: None,
            member: DEFAULT_MEMBER.to_string(),
        }
    }

    /// Sets the rule table consulted by [`AuthModule::permits`].
    pub fn ruleset(mut self, ruleset: RuleSet) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Configures a single-link chain.
    ///
    /// Mutually exclusive with [`authenticators`](Self::authenticators);
    /// [`build`](Self::build) rejects a builder given both.
    pub fn authenticator(
        mut self,
        link: impl FnOnce(Box<dyn Authenticator>) -> Box<dyn Authenticator> + 'static,
    ) -> Self {
        self.single_link = Some(Box::new(link));
        self
    }

    /// Configures the chain links, outermost first.
    pub fn authenticators(mut self, links: Vec<LinkBuilder>) -> Self {
        self.links = links;
        self
    }

    /// Sets the lifecycle member name (default `"actor"`).
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = member.into();
        self
    }

    pub fn build(self) -> Result<AuthModule> {
        let links = match (self.single_link, self.links.is_empty()) {
            (Some(single), true) => vec![single],
            (Some(_), false) => {
                return Err(Error::Config(
                    "authenticator and authenticators are mutually exclusive".to_string(),
                ));
            }
            (None, _) => self.links,
        };
        let head = links
            .into_iter()
            .rev()
            .fold(Box::new(NullAuthenticator) as Box<dyn Authenticator>, |next, link| {
                link(next)
            });
        Ok(AuthModule {
            ruleset: self.ruleset,
            head,
            member: self.member,
        })
    }
}

impl Default for AuthModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthModuleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthModuleBuilder")
            .field("member", &self.member)
            .field("links", &self.links.len())
            .finish_non_exhaustive()
    }
}

/// Facade over the rule table and the identity resolution chain.
///
/// The actor is resolved at most once per context: the first call that needs
/// it walks the chain and caches the outcome in the context's
/// [`ActorSlot`](crate::ActorSlot), including a resolved "no actor". At the
/// end of the context's life, [`finish`](Self::finish) writes the actor back
/// through the chain only when it changed from what was resolved.
pub struct AuthModule {
    ruleset: RuleSet,
    head: Box<dyn Authenticator>,
    member: String,
}

impl AuthModule {
    pub fn builder() -> AuthModuleBuilder {
        AuthModuleBuilder::new()
    }

    /// Lifecycle member name this module registers its resources under.
    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }

    /// Returns the context's actor, resolving it on first use.
    pub async fn actor(&self, ctx: &dyn Context) -> Result<Option<ActorRef>> {
        if let Some(current) = ctx.actor_slot().current() {
            return Ok(current);
        }
        let resolved = self.head.retrieve(ctx).await?;
        Ok(ctx.actor_slot().adopt(resolved))
    }

    /// Replaces the context's actor, or clears it with `None`.
    ///
    /// The change is written back by [`finish`](Self::finish).
    pub fn set_actor(&self, ctx: &dyn Context, actor: Option<ActorRef>) {
        ctx.actor_slot().set(actor);
    }

    /// Decides an operation, resolving the actor first.
    pub async fn permits(
        &self,
        ctx: &dyn Context,
        operation: &str,
        subjects: &[&(dyn Subject + 'static)],
    ) -> Result<bool> {
        self.actor(ctx).await?;
        Ok(self.ruleset.permits(ctx, operation, subjects))
    }

    /// Like [`permits`](Self::permits) but denial is an error.
    pub async fn check(
        &self,
        ctx: &dyn Context,
        operation: &str,
        subjects: &[&(dyn Subject + 'static)],
    ) -> Result<()> {
        self.actor(ctx).await?;
        self.ruleset.check(ctx, operation, subjects)
    }

    /// Writes the current actor through the chain unconditionally.
    pub async fn persist(&self, ctx: &dyn Context) -> Result<()> {
        let current = self.actor(ctx).await?;
        self.head.store(ctx, current.as_deref()).await
    }

    /// Writes the actor back if it changed since resolution.
    ///
    /// An untouched context stores nothing. An actor written with
    /// [`set_actor`](Self::set_actor) before any resolution counts as
    /// changed.
    pub async fn finish(&self, ctx: &dyn Context) -> Result<()> {
        let (original, current) = ctx.actor_slot().state();
        let Some(current) = current else {
            return Ok(());
        };
        let changed = match original {
            None => true,
            Some(original) => !same_actor(original.as_deref(), current.as_deref()),
        };
        if changed {
            self.head.store(ctx, current.as_deref()).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for AuthModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthModule")
            .field("member", &self.member)
            .field("ruleset", &self.ruleset)
            .finish_non_exhaustive()
    }
}

fn same_actor(a: Option<&dyn Actor>, b: Option<&dyn Actor>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.id() == b.id(),
        _ => false,
    }
}
