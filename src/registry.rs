use crate::subject::{Subject, TypeKey};
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

type Projection = Box<dyn for<'r> Fn(&'r dyn Any) -> Option<&'r dyn Any> + Send + Sync>;

struct Edge {
    parent: TypeKey,
    project: Projection,
}

/// Registry of declared subtype relationships.
///
/// Edges are directed from subtype to supertype and carry a projection used
/// to view a subtype value at its supertype. Queries follow edges
/// transitively; a type is always a subtype of itself.
#[derive(Default)]
pub struct TypeRegistry {
    edges: HashMap<TypeId, Vec<Edge>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `Child` a subtype of `Parent`, viewed through `project`.
    pub fn register<Child, Parent>(&mut self, project: fn(&Child) -> &Parent)
    where
        Child: Any,
        Parent: Any,
    {
        let edge = Edge {
            parent: TypeKey::of::<Parent>(),
            project: Box::new(move |value: &dyn Any| {
                value
                    .downcast_ref::<Child>()
                    .map(|child| project(child) as &dyn Any)
            }),
        };
        self.edges.entry(TypeId::of::<Child>()).or_default().push(edge);
    }

    /// Returns whether `child` equals `parent` or has a registered
    /// (transitive) edge to it.
    pub fn is_subtype(&self, child: TypeKey, parent: TypeKey) -> bool {
        if child == parent {
            return true;
        }
        let mut visited = HashSet::from([child.id()]);
        let mut queue = VecDeque::from([child.id()]);
        while let Some(current) = queue.pop_front() {
            for edge in self.edges.get(&current).into_iter().flatten() {
                if edge.parent == parent {
                    return true;
                }
                if visited.insert(edge.parent.id()) {
                    queue.push_back(edge.parent.id());
                }
            }
        }
        false
    }

    /// Views a subject as `T` through registered projections, if `T` is a
    /// (transitive) supertype of the subject's type.
    pub fn view_as<'r, T: Any>(&self, subject: &'r dyn Subject) -> Option<&'r T> {
        let target = TypeId::of::<T>();
        let key = subject.type_key();
        let mut visited = HashSet::from([key.id()]);
        let mut queue: VecDeque<(TypeId, &'r dyn Any)> =
            VecDeque::from([(key.id(), subject.as_any())]);
        while let Some((current, view)) = queue.pop_front() {
            if current == target {
                return view.downcast_ref::<T>();
            }
            for edge in self.edges.get(&current).into_iter().flatten() {
                if !visited.insert(edge.parent.id()) {
                    continue;
                }
                if let Some(parent_view) = (edge.project)(view) {
                    queue.push_back((edge.parent.id(), parent_view));
                }
            }
        }
        None
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: usize = self.edges.values().map(Vec::len).sum();
        f.debug_struct("TypeRegistry").field("edges", &edges).finish()
    }
}
