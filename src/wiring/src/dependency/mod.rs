use std::collections::{HashMap, HashSet};

use snafu::prelude::*;

use crate::container::Instance;
use crate::reference::{Reference, ReferenceId};

/// The references an injector needs before it can build its object, together
/// with the instances resolved for them so far.
///
/// The declared set is fixed at construction. Resolved instances only ever
/// cover declared references, so the list is fulfilled exactly when every
/// declared reference has received an instance.
#[derive(Debug, Clone, Default)]
pub struct DependencyList {
    declared: Vec<Reference>,
    index: HashMap<ReferenceId, usize>,
    resolved: HashMap<ReferenceId, Instance>,
}

impl DependencyList {
    /// Creates a list declaring `references`. References sharing an id
    /// collapse into one entry; the later one replaces the earlier one in
    /// place.
    pub fn new<I>(references: I) -> Self
    where
        I: IntoIterator<Item = Reference>,
    {
        let mut declared: Vec<Reference> = Vec::new();
        let mut index = HashMap::new();

        for reference in references {
            let id = reference.id();
            if let Some(&position) = index.get(&id) {
                declared[position] = reference;
            } else {
                index.insert(id, declared.len());
                declared.push(reference);
            }
        }

        Self {
            declared,
            index,
            resolved: HashMap::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the declared references in declaration order.
    pub fn list(&self) -> &[Reference] {
        &self.declared
    }

    pub fn get(&self, id: &ReferenceId) -> Option<&Reference> {
        self.index.get(id).map(|&position| &self.declared[position])
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        self.index.contains_key(&reference.id())
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Records `instance` as the resolved value of `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Undeclared`] if `reference` is not part of
    /// this list, or [`DependencyError::Mismatched`] if `instance` is not of
    /// the type `reference` asks for.
    pub fn set_instantiated_dependency(
        &mut self,
        reference: &Reference,
        instance: Instance,
    ) -> Result<(), DependencyError> {
        let id = reference.id();
        ensure!(
            self.index.contains_key(&id),
            UndeclaredSnafu {
                reference: reference.clone()
            }
        );
        ensure!(
            instance.type_id() == reference.class().type_id(),
            MismatchedSnafu {
                reference: reference.clone(),
                expected: reference.class_name(),
                found: instance.type_name(),
            }
        );

        self.resolved.insert(id, instance);
        Ok(())
    }

    /// Returns the instance resolved for `reference`, or `None` while it is
    /// still pending.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyError::Undeclared`] if `reference` is not part of
    /// this list.
    pub fn instantiated_dependency(
        &self,
        reference: &Reference,
    ) -> Result<Option<&Instance>, DependencyError> {
        let id = reference.id();
        ensure!(
            self.index.contains_key(&id),
            UndeclaredSnafu {
                reference: reference.clone()
            }
        );
        Ok(self.resolved.get(&id))
    }

    pub fn are_all_dependencies_fulfilled(&self) -> bool {
        self.resolved.len() == self.declared.len()
    }

    /// Iterates over the declared references which have no instance yet.
    pub fn pending(&self) -> impl Iterator<Item = &Reference> + '_ {
        self.declared
            .iter()
            .filter(|reference| !self.resolved.contains_key(&reference.id()))
    }

    /// Returns true if both lists declare the same set of references,
    /// regardless of declaration order and of what has been resolved.
    pub fn is_identical(&self, other: &Self) -> bool {
        if self.index.len() != other.index.len() {
            return false;
        }
        let ids: HashSet<&ReferenceId> = self.index.keys().collect();
        other.index.keys().all(|id| ids.contains(id))
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DependencyError {
    #[snafu(display("the reference {reference} is not declared as a dependency"))]
    #[non_exhaustive]
    Undeclared { reference: Reference },
    #[snafu(display("could not use a {found} for the dependency {reference} which expects a {expected}"))]
    #[non_exhaustive]
    Mismatched {
        reference: Reference,
        expected: &'static str,
        found: &'static str,
    },
}
