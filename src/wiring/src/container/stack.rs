use std::collections::HashSet;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::container::ResolveError;
use crate::dependency::DependencyList;
use crate::injector::Injector;
use crate::reference::{Reference, ReferenceId};

/// One pending request on the resolution stack.
///
/// An item starts unexpanded. It becomes expanded once it has pushed its
/// unresolved dependencies, and is popped after its instance is handed to its
/// parent or returned to the caller.
pub(super) struct StackItem {
    reference: Reference,
    parent: Option<usize>,
    resolution: Option<Resolution>,
    expanded: bool,
}

/// The injector of an item and the dependency list it is filling.
pub(super) struct Resolution {
    pub injector: Arc<dyn Injector>,
    pub dependencies: DependencyList,
}

impl StackItem {
    fn new(reference: Reference, parent: Option<usize>) -> Self {
        Self {
            reference,
            parent,
            resolution: None,
            expanded: false,
        }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn set_resolution(&mut self, injector: Arc<dyn Injector>) {
        let dependencies = injector.dependency_list();
        self.resolution = Some(Resolution {
            injector,
            dependencies,
        });
    }

    pub fn take_resolution(&mut self) -> Option<Resolution> {
        self.resolution.take()
    }

    pub fn dependencies_mut(&mut self) -> Option<&mut DependencyList> {
        self.resolution
            .as_mut()
            .map(|resolution| &mut resolution.dependencies)
    }

    pub fn is_fulfilled(&self) -> bool {
        self.resolution
            .as_ref()
            .is_some_and(|resolution| resolution.dependencies.are_all_dependencies_fulfilled())
    }
}

/// An explicit LIFO worklist replacing recursion over the object graph.
///
/// Only the top item is ever expanded, and every item above an expanded one
/// descends from it. Hence the expanded items are exactly the ancestors of
/// the top item, and `expanded` indexes that path for constant time cycle
/// checks.
pub(super) struct ResolutionStack {
    items: Vec<StackItem>,
    expanded: HashSet<ReferenceId>,
    limit: usize,
}

impl ResolutionStack {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            expanded: HashSet::new(),
            limit,
        }
    }

    pub fn top(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    pub fn item_mut(&mut self, index: usize) -> &mut StackItem {
        &mut self.items[index]
    }

    pub fn push(&mut self, reference: Reference, parent: Option<usize>) -> Result<(), ResolveError> {
        if self.items.len() >= self.limit {
            warn!(%reference, limit = self.limit, "resolution stack limit exceeded");
            return Err(ResolveError::StackLimitExceeded {
                reference,
                limit: self.limit,
            });
        }
        trace!(%reference, depth = self.items.len(), "push");
        self.items.push(StackItem::new(reference, parent));
        Ok(())
    }

    pub fn pop(&mut self) -> Option<StackItem> {
        let item = self.items.pop()?;
        if item.expanded {
            self.expanded.remove(&item.reference.id());
        }
        Some(item)
    }

    /// Marks the item at `index` as expanded and pushes every dependency it
    /// still waits for, the first declared one ending up on top.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CircularDependency`] if a dependency is already
    /// being expanded on the path leading to the item, including the item
    /// itself.
    pub fn expand(&mut self, index: usize) -> Result<(), ResolveError> {
        let item = &mut self.items[index];
        if item.expanded {
            unreachable!("an expanded item should be fulfilled once its children are popped");
        }
        item.expanded = true;
        let required_by = item.reference.clone();
        let pending: Vec<Reference> = match item.resolution() {
            Some(resolution) => resolution.dependencies.pending().cloned().collect(),
            None => unreachable!("an item should acquire its injector before expansion"),
        };
        self.expanded.insert(required_by.id());

        if let Some(requested) = pending
            .iter()
            .find(|reference| self.expanded.contains(&reference.id()))
        {
            warn!(%requested, %required_by, "circular dependency detected");
            return Err(ResolveError::CircularDependency {
                requested: requested.clone(),
                required_by,
            });
        }

        for reference in pending.into_iter().rev() {
            self.push(reference, Some(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::injector::{Argument, CallbackInjector};

    use super::*;

    struct Node;

    fn node(name: &str) -> Reference {
        Reference::transient::<Node>(name)
    }

    fn injector_of(name: &str, dependencies: &[&str]) -> Arc<dyn Injector> {
        Arc::new(CallbackInjector::new(
            node(name),
            || Ok::<_, std::convert::Infallible>(Node),
            dependencies.iter().map(|name| Argument::from(node(name))),
        ))
    }

    #[test]
    fn resolution_stack_expand_succeeds() {
        let mut stack = ResolutionStack::new(16);
        stack.push(node("a"), None).unwrap();
        stack.item_mut(0).set_resolution(injector_of("a", &["b", "c"]));
        stack.expand(0).unwrap();

        assert_eq!(stack.items.len(), 3);
        assert_eq!(stack.items[2].reference(), &node("b"));
        assert_eq!(stack.items[2].parent(), Some(0));
        assert_eq!(stack.items[1].reference(), &node("c"));

        let popped = stack.pop().unwrap();
        assert_eq!(popped.reference(), &node("b"));
        assert_eq!(stack.top(), Some(1));
    }

    #[test]
    fn resolution_stack_expand_succeeds_when_sibling_is_pending() {
        let mut stack = ResolutionStack::new(16);
        stack.push(node("a"), None).unwrap();
        stack.item_mut(0).set_resolution(injector_of("a", &["c", "b"]));
        stack.expand(0).unwrap();

        let top = stack.top().unwrap();
        assert_eq!(stack.items[top].reference(), &node("c"));
        stack.item_mut(top).set_resolution(injector_of("c", &["b"]));
        stack.expand(top).unwrap();

        assert_eq!(stack.items.len(), 4);
        assert_eq!(stack.items[3].reference(), &node("b"));
        assert_eq!(stack.items[3].parent(), Some(top));
    }

    #[test]
    fn resolution_stack_expand_fails_when_dependency_is_an_ancestor() {
        let mut stack = ResolutionStack::new(16);
        stack.push(node("a"), None).unwrap();
        stack.item_mut(0).set_resolution(injector_of("a", &["b"]));
        stack.expand(0).unwrap();
        stack.item_mut(1).set_resolution(injector_of("b", &["a"]));

        assert!(matches!(
            stack.expand(1),
            Err(ResolveError::CircularDependency { requested, required_by })
                if requested == node("a") && required_by == node("b")
        ));
    }

    #[test]
    fn resolution_stack_expand_fails_when_item_depends_on_itself() {
        let mut stack = ResolutionStack::new(16);
        stack.push(node("a"), None).unwrap();
        stack.item_mut(0).set_resolution(injector_of("a", &["a"]));

        assert!(matches!(
            stack.expand(0),
            Err(ResolveError::CircularDependency { .. })
        ));
    }

    #[test]
    fn resolution_stack_push_fails_when_limit_is_reached() {
        let mut stack = ResolutionStack::new(2);
        stack.push(node("a"), None).unwrap();
        stack.item_mut(0).set_resolution(injector_of("a", &["b", "c"]));

        assert!(matches!(
            stack.expand(0),
            Err(ResolveError::StackLimitExceeded { limit: 2, .. })
        ));
    }

    #[test]
    fn resolution_stack_pop_releases_expanded_path() {
        let mut stack = ResolutionStack::new(16);
        stack.push(node("a"), None).unwrap();
        stack.item_mut(0).set_resolution(injector_of("a", &["b"]));
        stack.expand(0).unwrap();
        stack.pop().unwrap();
        stack.pop().unwrap();

        assert_eq!(stack.top(), None);
        assert!(stack.expanded.is_empty());
    }
}
