use crate::context::Context;
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::subject::{Subject, Subjects, TypeKey, type_names};
use crate::types::OperationName;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use tracing::{debug, warn};

/// Ordered argument-type signature of a rule.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<TypeKey>);

impl Signature {
    /// Creates a signature from type keys in position order.
    pub fn new(keys: Vec<TypeKey>) -> Self {
        Self(keys)
    }

    /// Creates the zero-argument signature.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the signature has no positions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the type names, in position order.
    pub fn type_names(&self) -> Vec<&'static str> {
        self.0.iter().map(TypeKey::name).collect()
    }

    pub(crate) fn keys(&self) -> &[TypeKey] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("Signature");
        for key in &self.0 {
            tuple.field(&key.name());
        }
        tuple.finish()
    }
}

/// Builds a [`Signature`] from a list of types.
///
/// `signature![]` is the zero-argument signature.
#[macro_export]
macro_rules! signature {
    () => {
        $crate::Signature::empty()
    };
    ($($ty:ty),+ $(,)?) => {
        $crate::Signature::new(::std::vec![$($crate::TypeKey::of::<$ty>()),+])
    };
}

type Rule = Box<dyn Fn(&dyn Context, Subjects<'_>) -> bool + Send + Sync>;

/// Registry of authorization rules dispatched by operation name and
/// argument types.
///
/// Rules for one operation are scanned in registration order and the first
/// signature whose arity and per-position types match decides; an earlier
/// supertype rule therefore shadows a later subtype rule. An operation with
/// no matching rule is denied.
#[derive(Default)]
pub struct RuleSet {
    rules: IndexMap<OperationName, IndexMap<Signature, Rule>>,
    registry: TypeRegistry,
}

impl RuleSet {
    /// Creates an empty rule set. It denies every operation until rules are
    /// registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule for an operation under an argument-type signature.
    ///
    /// A rule already registered under the same operation and signature is
    /// replaced in place, keeping its position in the scan order.
    pub fn register(
        &mut self,
        operation: impl AsRef<str>,
        signature: Signature,
        predicate: impl Fn(&dyn Context, Subjects<'_>) -> bool + Send + Sync + 'static,
    ) -> Result<()> {
        let operation = OperationName::new(operation)?;
        self.rules
            .entry(operation)
            .or_default()
            .insert(signature, Box::new(predicate));
        Ok(())
    }

    /// Declares `Child` a subtype of `Parent` for signature matching and
    /// subject projection.
    pub fn register_subtype<Child, Parent>(&mut self, project: fn(&Child) -> &Parent)
    where
        Child: Any,
        Parent: Any,
    {
        self.registry.register(project);
    }

    /// Returns the subtype registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns whether the context permits `operation` on `subjects`.
    ///
    /// With no matching rule the operation is denied and a coverage warning
    /// is emitted; a missing rule never grants access.
    pub fn permits(&self, ctx: &dyn Context, operation: &str, subjects: &[&(dyn Subject + 'static)]) -> bool {
        if let Some(table) = self.rules.get(operation) {
            for (signature, rule) in table {
                if !self.signature_matches(signature, subjects) {
                    continue;
                }
                let granted = rule(ctx, Subjects::new(subjects, &self.registry));
                debug!(
                    operation,
                    subjects = %type_names(subjects).join(", "),
                    granted,
                    "authorization decision"
                );
                return granted;
            }
        }
        warn!(
            operation,
            subjects = %type_names(subjects).join(", "),
            "no rule covers operation"
        );
        false
    }

    /// Errors with [`Error::NotAuthorized`] unless the context permits
    /// `operation` on `subjects`.
    pub fn check(&self, ctx: &dyn Context, operation: &str, subjects: &[&(dyn Subject + 'static)]) -> Result<()> {
        if self.permits(ctx, operation, subjects) {
            return Ok(());
        }
        Err(Error::NotAuthorized {
            operation: operation.to_string(),
            subject_types: type_names(subjects),
        })
    }

    fn signature_matches(&self, signature: &Signature, subjects: &[&(dyn Subject + 'static)]) -> bool {
        if signature.len() != subjects.len() {
            return false;
        }
        signature
            .keys()
            .iter()
            .zip(subjects)
            .all(|(expected, subject)| self.registry.is_subtype((**subject).type_key(), *expected))
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("operations", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
