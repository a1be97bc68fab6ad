use std::collections::VecDeque;
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::{Instance, Managed};
use crate::dependency::DependencyList;
use crate::injector::{InjectError, InvalidDependencySnafu, UnfulfilledSnafu};
use crate::reference::{ClassId, Reference};

/// One positional argument of a constructor or callback.
#[derive(Debug, Clone)]
pub enum Argument {
    /// A literal value passed as is.
    Value(Instance),
    /// A placeholder replaced by the resolved instance of the reference.
    Reference(Reference),
}

impl Argument {
    pub fn value<T: Managed>(value: T) -> Self {
        Self::Value(Instance::new(value))
    }

    pub fn reference(reference: Reference) -> Self {
        Self::Reference(reference)
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            Self::Value(_) => None,
        }
    }
}

impl From<Reference> for Argument {
    fn from(reference: Reference) -> Self {
        Self::Reference(reference)
    }
}

impl From<Instance> for Argument {
    fn from(instance: Instance) -> Self {
        Self::Value(instance)
    }
}

/// Collects the [`Reference`] placeholders of `arguments` into a fresh
/// [`DependencyList`].
pub(crate) fn dependency_list_of(arguments: &[Argument]) -> DependencyList {
    DependencyList::new(
        arguments
            .iter()
            .filter_map(Argument::as_reference)
            .cloned(),
    )
}

/// Positional values handed to a constructor or callback, with every
/// reference placeholder already substituted.
#[derive(Debug)]
pub struct Arguments {
    values: VecDeque<Instance>,
    position: usize,
}

impl Arguments {
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Instance>,
    {
        Self {
            values: values.into_iter().collect(),
            position: 0,
        }
    }

    /// Substitutes each placeholder in `arguments` with its instance from the
    /// fulfilled `dependencies`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::Unfulfilled`] if a placeholder has no resolved
    /// instance, or [`InjectError::InvalidDependency`] if `dependencies` does
    /// not declare it at all.
    pub fn resolve(
        reference: &Reference,
        arguments: &[Argument],
        dependencies: &DependencyList,
    ) -> Result<Self, InjectError> {
        let values = arguments
            .iter()
            .map(|argument| -> Result<Instance, InjectError> {
                match argument {
                    Argument::Value(value) => Ok(value.clone()),
                    Argument::Reference(dependency) => dependencies
                        .instantiated_dependency(dependency)
                        .context(InvalidDependencySnafu {
                            reference: reference.clone(),
                        })?
                        .cloned()
                        .context(UnfulfilledSnafu {
                            reference: reference.clone(),
                            dependency: dependency.clone(),
                        }),
                }
            })
            .collect::<Result<VecDeque<_>, _>>()?;

        Ok(Self {
            values,
            position: 0,
        })
    }

    /// Takes the next positional value as an `Arc<T>`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] if all values are taken, or
    /// [`ArgumentError::Mismatched`] if the next value is not a `T`. A
    /// mismatched value is consumed anyway.
    pub fn take<T: Managed>(&mut self) -> Result<Arc<T>, ArgumentError> {
        let position = self.position;
        let value = self.take_instance()?;
        value.downcast::<T>().context(MismatchedSnafu {
            position,
            expected: ClassId::of::<T>().name(),
            found: value.type_name(),
        })
    }

    /// Takes the next positional value without looking at its type.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Missing`] if all values are taken.
    pub fn take_instance(&mut self) -> Result<Instance, ArgumentError> {
        let position = self.position;
        let value = self
            .values
            .pop_front()
            .context(MissingSnafu { position })?;
        self.position += 1;
        Ok(value)
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Checks that every positional value has been taken.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Unused`] if some values are left.
    pub fn ensure_consumed(&self) -> Result<(), ArgumentError> {
        ensure!(
            self.values.is_empty(),
            UnusedSnafu {
                count: self.values.len(),
            }
        );
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ArgumentError {
    #[snafu(display("argument #{position} is missing"))]
    #[non_exhaustive]
    Missing { position: usize },
    #[snafu(display("argument #{position} should be a {expected} but is a {found}"))]
    #[non_exhaustive]
    Mismatched {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[snafu(display("{count} trailing argument(s) are never taken"))]
    #[non_exhaustive]
    Unused { count: usize },
}

#[cfg(test)]
mod tests {
    use crate::dependency::DependencyError;

    use super::*;

    struct Engine;

    struct Car;

    #[test]
    fn dependency_list_of_succeeds() {
        let engine = Reference::singleton::<Engine>("Default");
        let arguments = [
            Argument::value(4u8),
            Argument::from(engine.clone()),
            Argument::reference(engine.clone()),
        ];

        let list = dependency_list_of(&arguments);
        assert_eq!(list.list(), &[engine]);
    }

    #[test]
    fn arguments_resolve_succeeds() {
        let car = Reference::transient::<Car>("Default");
        let engine = Reference::singleton::<Engine>("Default");
        let arguments = [Argument::value(4u8), Argument::from(engine.clone())];
        let mut list = dependency_list_of(&arguments);
        list.set_instantiated_dependency(&engine, Instance::new(Engine))
            .unwrap();

        let mut args = Arguments::resolve(&car, &arguments, &list).unwrap();
        assert_eq!(args.remaining(), 2);
        assert_eq!(*args.take::<u8>().unwrap(), 4);
        assert!(args.take::<Engine>().is_ok());
        assert!(matches!(
            args.take::<Engine>(),
            Err(ArgumentError::Missing { position: 2 })
        ));
    }

    #[test]
    fn arguments_resolve_fails_when_dependency_is_pending() {
        let car = Reference::transient::<Car>("Default");
        let engine = Reference::singleton::<Engine>("Default");
        let arguments = [Argument::from(engine.clone())];
        let list = dependency_list_of(&arguments);

        assert!(matches!(
            Arguments::resolve(&car, &arguments, &list),
            Err(InjectError::Unfulfilled { dependency, .. }) if dependency == engine
        ));
    }

    #[test]
    fn arguments_take_fails_when_type_mismatches() {
        let mut args = Arguments::new([Instance::new(1u32)]);
        assert!(matches!(
            args.take::<String>(),
            Err(ArgumentError::Mismatched { position: 0, found: "u32", .. })
        ));
        assert_eq!(args.remaining(), 0);
    }

    #[test]
    fn arguments_resolve_fails_when_list_is_foreign() {
        let car = Reference::transient::<Car>("Default");
        let engine = Reference::singleton::<Engine>("Default");
        let arguments = [Argument::from(engine)];

        assert!(matches!(
            Arguments::resolve(&car, &arguments, &DependencyList::empty()),
            Err(InjectError::InvalidDependency {
                source: DependencyError::Undeclared { .. },
                ..
            })
        ));
    }

    #[test]
    fn arguments_ensure_consumed_fails_when_values_are_left() {
        let mut args = Arguments::new([Instance::new(1u32), Instance::new(2u32)]);
        args.take::<u32>().unwrap();

        assert!(matches!(
            args.ensure_consumed(),
            Err(ArgumentError::Unused { count: 1 })
        ));
        args.take::<u32>().unwrap();
        assert!(args.ensure_consumed().is_ok());
    }
}
