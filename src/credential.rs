use crate::actor::{Actor, ActorRef};
use crate::authenticator::Authenticator;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::store::ActorStore;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Compares a submitted secret against the stored one.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, submitted: &str, stored: &str) -> bool;
}

/// Verifier that compares secrets in constant time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantTimeVerifier;

impl CredentialVerifier for ConstantTimeVerifier {
    fn verify(&self, submitted: &str, stored: &str) -> bool {
        submitted.as_bytes().ct_eq(stored.as_bytes()).into()
    }
}

/// Chain link that accepts form-submitted credentials.
///
/// When the context carries both credential fields and they match a stored
/// record, the resolved actor is persisted through the rest of the chain so
/// later requests skip the login. Any miss, absent fields, unknown username,
/// or failed verification, falls through to the next link without an error.
pub struct CredentialAuthenticator {
    store: Arc<dyn ActorStore>,
    verifier: Box<dyn CredentialVerifier>,
    username_field: String,
    password_field: String,
    next: Box<dyn Authenticator>,
}

impl CredentialAuthenticator {
    pub fn new(store: Arc<dyn ActorStore>, next: Box<dyn Authenticator>) -> Self {
        Self {
            store,
            verifier: Box::new(ConstantTimeVerifier),
            username_field: "username".to_string(),
            password_field: "password".to_string(),
            next,
        }
    }

    /// Replaces the secret verifier (default [`ConstantTimeVerifier`]).
    pub fn verifier(mut self, verifier: impl CredentialVerifier + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    /// Sets the form field holding the username (default `"username"`).
    pub fn username_field(mut self, name: impl Into<String>) -> Self {
        self.username_field = name.into();
        self
    }

    /// Sets the form field holding the secret (default `"password"`).
    pub fn password_field(mut self, name: impl Into<String>) -> Self {
        self.password_field = name.into();
        self
    }

    async fn login_attempt(&self, ctx: &dyn Context) -> Result<Option<ActorRef>> {
        let Some(username) = ctx.form_field(&self.username_field) else {
            return Ok(None);
        };
        let Some(password) = ctx.form_field(&self.password_field) else {
            return Ok(None);
        };
        let Some(record) = self
            .store
            .lookup_by_username(&username)
            .await
            .map_err(Error::Store)?
        else {
            return Ok(None);
        };
        if !self.verifier.verify(&password, &record.secret) {
            return Ok(None);
        }
        self.next.store(ctx, Some(record.actor.as_ref())).await?;
        debug!(username = %username, "accepted submitted credentials");
        Ok(Some(record.actor))
    }
}

#[async_trait]
impl Authenticator for CredentialAuthenticator {
    async fn retrieve(&self, ctx: &dyn Context) -> Result<Option<ActorRef>> {
        match self.login_attempt(ctx).await? {
            Some(actor) => Ok(Some(actor)),
            None => self.next.retrieve(ctx).await,
        }
    }

    async fn store(&self, ctx: &dyn Context, actor: Option<&dyn Actor>) -> Result<()> {
        self.next.store(ctx, actor).await
    }
}

impl fmt::Debug for CredentialAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialAuthenticator")
            .field("username_field", &self.username_field)
            .field("password_field", &self.password_field)
            .finish_non_exhaustive()
    }
}
