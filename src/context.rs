use crate::actor::ActorRef;
use std::sync::Mutex;

/// String-keyed session storage collaborator.
///
/// Implemented by the host over its session backend; interior mutability is
/// the implementor's concern.
pub trait Session: Send + Sync {
    /// Returns whether a key is present.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the value stored under a key.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value under a key.
    fn set(&self, key: &str, value: String);

    /// Removes a key.
    fn remove(&self, key: &str);
}

/// Per-request collaborator implemented by the host application.
pub trait Context: Send + Sync {
    /// Session storage bound to this context.
    fn session(&self) -> &dyn Session;

    /// Slot holding this context's actor.
    fn actor_slot(&self) -> &ActorSlot;

    /// Returns a submitted form field. The default means the context
    /// carries no form request.
    fn form_field(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Extension accessors for [`Context`] values.
pub trait ContextExt {
    /// Returns the actor currently bound to the context, if resolved or
    /// written.
    fn actor(&self) -> Option<ActorRef>;
}

impl<C: Context + ?Sized> ContextExt for C {
    fn actor(&self) -> Option<ActorRef> {
        self.actor_slot().current().flatten()
    }
}

/// Per-context cell holding the resolved actor.
///
/// Host context types embed one slot per request. The slot tracks the value
/// installed by chain resolution and the current value independently, so
/// teardown can detect changes. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct ActorSlot {
    state: Mutex<SlotState>,
}

#[derive(Debug, Default)]
struct SlotState {
    original: Option<Option<ActorRef>>,
    current: Option<Option<ActorRef>>,
}

impl ActorSlot {
    /// Creates an untouched slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value, or `None` when the slot is untouched.
    pub fn current(&self) -> Option<Option<ActorRef>> {
        self.state.lock().expect("poisoned lock").current.clone()
    }

    /// Overwrites the current value.
    pub fn set(&self, actor: Option<ActorRef>) {
        self.state.lock().expect("poisoned lock").current = Some(actor);
    }

    /// Installs a chain-resolved value unless one was written already, and
    /// returns the value now current.
    pub(crate) fn adopt(&self, resolved: Option<ActorRef>) -> Option<ActorRef> {
        let mut state = self.state.lock().expect("poisoned lock");
        if let Some(current) = &state.current {
            return current.clone();
        }
        state.original = Some(resolved.clone());
        state.current = Some(resolved.clone());
        resolved
    }

    pub(crate) fn state(&self) -> (Option<Option<ActorRef>>, Option<Option<ActorRef>>) {
        let state = self.state.lock().expect("poisoned lock");
        (state.original.clone(), state.current.clone())
    }
}
