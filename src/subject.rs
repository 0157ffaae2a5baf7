use crate::registry::TypeRegistry;
use std::any::{Any, TypeId};
use std::hash::{Hash, Hasher};

/// Type identity of a subject or signature position.
///
/// Equality and hashing use the [`TypeId`] alone; the name is carried for
/// log fields and error messages.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for a concrete type.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Argument value passed to a rule predicate.
///
/// Blanket-implemented for every `'static` type, so application values go
/// straight into [`crate::RuleSet::permits`] without wrapper types.
pub trait Subject: Any {
    /// Upcasts to [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the subject's type identity.
    fn type_key(&self) -> TypeKey;
}

impl<T: Any> Subject for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }
}

/// Positional view over a rule invocation's subjects.
///
/// Handed to predicates by [`crate::RuleSet::permits`]. Typed access goes
/// through the subtype registry, so a rule registered for a supertype can
/// read a subtype argument at the supertype.
#[derive(Clone, Copy)]
pub struct Subjects<'a> {
    items: &'a [&'a (dyn Subject + 'static)],
    registry: &'a TypeRegistry,
}

impl<'a> Subjects<'a> {
    pub(crate) fn new(items: &'a [&'a (dyn Subject + 'static)], registry: &'a TypeRegistry) -> Self {
        Self { items, registry }
    }

    /// Returns the number of subjects.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether there are no subjects.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the subject at `index` as `T`, directly or through a
    /// registered supertype projection.
    pub fn get<T: Any>(&self, index: usize) -> Option<&'a T> {
        let subject = *self.items.get(index)?;
        if let Some(value) = subject.as_any().downcast_ref::<T>() {
            return Some(value);
        }
        self.registry.view_as(subject)
    }

    /// Returns the subjects' type names, in position order.
    pub fn type_names(&self) -> Vec<&'static str> {
        type_names(self.items)
    }
}

pub(crate) fn type_names(subjects: &[&(dyn Subject + 'static)]) -> Vec<&'static str> {
    subjects.iter().map(|subject| (**subject).type_key().name()).collect()
}
