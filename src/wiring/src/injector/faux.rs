use crate::container::{Instance, Managed};
use crate::dependency::DependencyList;
use crate::injector::{InjectError, Injector};
use crate::reference::{ConfigurationError, Reference};

/// An [`Injector`] which hands out an object built ahead of time.
///
/// Only singleton references accept a precomputed object, since the same
/// object is handed out on every request.
#[derive(Debug)]
pub struct FauxInjector {
    reference: Reference,
    instance: Instance,
}

impl FauxInjector {
    /// # Errors
    ///
    /// Returns [`ConfigurationError::TransientInstance`] if `reference` is not
    /// a singleton.
    pub fn new(reference: Reference, instance: Instance) -> Result<Self, ConfigurationError> {
        if reference.is_singleton() {
            Ok(Self {
                reference,
                instance,
            })
        } else {
            Err(ConfigurationError::TransientInstance { reference })
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigurationError::TransientInstance`] if `reference` is not
    /// a singleton.
    pub fn of<T: Managed>(reference: Reference, value: T) -> Result<Self, ConfigurationError> {
        Self::new(reference, Instance::new(value))
    }
}

impl Injector for FauxInjector {
    fn reference(&self) -> &Reference {
        &self.reference
    }

    fn dependency_list(&self) -> DependencyList {
        DependencyList::empty()
    }

    fn inject(&self, _dependencies: DependencyList) -> Result<Instance, InjectError> {
        Ok(self.instance.clone())
    }
}
