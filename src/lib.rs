//! Authorization decisions and chained identity resolution.
//!
//! This crate provides a [`RuleSet`] dispatching authorization rules by
//! operation name and the runtime types of the involved subjects, and an
//! [`AuthModule`] pairing a rule table with a chain of [`Authenticator`]s
//! that resolve the acting identity from sessions or submitted credentials.
//! The default behavior is deny-by-default: an operation no rule covers is
//! refused.
//!
//! # Examples
//!
//! Registering a rule and deciding an operation:
//! ```no_run
//! use rulegate::{ActorSlot, Context, RuleSet, Session, signature};
//!
//! struct Document {
//!     owner: String,
//! }
//!
//! struct NoSession;
//!
//! impl Session for NoSession {
//!     fn get(&self, _key: &str) -> Option<String> {
//!         None
//!     }
//!     fn set(&self, _key: &str, _value: String) {}
//!     fn remove(&self, _key: &str) {}
//! }
//!
//! struct RequestContext {
//!     slot: ActorSlot,
//! }
//!
//! impl Context for RequestContext {
//!     fn session(&self) -> &dyn Session {
//!         &NoSession
//!     }
//!     fn actor_slot(&self) -> &ActorSlot {
//!         &self.slot
//!     }
//! }
//!
//! let mut rules = RuleSet::new();
//! rules
//!     .register("edit", signature![Document], |_ctx, subjects| {
//!         subjects
//!             .get::<Document>(0)
//!             .is_some_and(|doc| doc.owner == "ada")
//!     })
//!     .unwrap();
//!
//! let ctx = RequestContext { slot: ActorSlot::new() };
//! let doc = Document { owner: "ada".to_string() };
//! assert!(rules.permits(&ctx, "edit", &[&doc]));
//! ```
//!
//! Resolving an actor through a session-backed chain (enable
//! `memory-session` and `memory-store`):
//! ```no_run
//! # #[cfg(all(feature = "memory-session", feature = "memory-store"))]
//! # {
//! use rulegate::{AuthModule, MemoryActorStore, SessionAuthenticator};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryActorStore::new());
//! let module = AuthModule::builder()
//!     .authenticator(move |next| Box::new(SessionAuthenticator::with_store(store, next)))
//!     .build()
//!     .unwrap();
//! # let _ = module;
//! # }
//! ```
#![forbid(unsafe_code)]

mod actor;
mod authenticator;
mod context;
mod credential;
mod error;
mod lifecycle;
mod module;
mod registry;
mod ruleset;
mod store;
mod subject;
mod types;

#[cfg(feature = "memory-session")]
mod memory_session;

#[cfg(feature = "memory-store")]
mod memory_store;

pub use crate::actor::{Actor, ActorCodec, ActorRef};
pub use crate::authenticator::{
    Authenticator, DEFAULT_SESSION_KEY, NullAuthenticator, SessionAuthenticator,
};
pub use crate::context::{ActorSlot, Context, ContextExt, Session};
pub use crate::credential::{ConstantTimeVerifier, CredentialAuthenticator, CredentialVerifier};
pub use crate::error::{Error, Result, StoreError};
pub use crate::lifecycle::{Lifecycle, Permits, PersistActor, Resource, ResourceValue};
pub use crate::module::{AuthModule, AuthModuleBuilder, LinkBuilder};
pub use crate::registry::TypeRegistry;
pub use crate::ruleset::{RuleSet, Signature};
pub use crate::store::{ActorRecord, ActorStore};
pub use crate::subject::{Subject, Subjects, TypeKey};
pub use crate::types::{ActorId, OperationName};

#[cfg(feature = "serde")]
pub use crate::actor::JsonActorCodec;

#[cfg(feature = "memory-session")]
pub use crate::memory_session::MemorySession;

#[cfg(feature = "memory-store")]
pub use crate::memory_store::MemoryActorStore;
