use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::config::{BindingError, Config, ConfigurerImpl, RegistryError};
use crate::injector::Injector;
use crate::module::Module;
use crate::reference::{Reference, ReferenceId};

/// A [`Config`] made of static declarations, keyed by [`ReferenceId`].
pub struct Bindings {
    injectors: HashMap<ReferenceId, Arc<dyn Injector>>,
}

impl Bindings {
    /// Collects every binding declared by `module`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Aggregated`] with every problem found if any
    /// binding is duplicated or misconfigured, or any module fails.
    pub fn init<M: Module>(module: M) -> Result<Self, RegistryError> {
        let mut configurer = ConfigurerImpl::new();
        module.setup(&mut configurer);
        Self::from_configurer(configurer)
    }

    /// Finishes a manually filled configurer.
    ///
    /// # Errors
    ///
    /// Same as [`Bindings::init`].
    pub fn from_configurer(configurer: ConfigurerImpl) -> Result<Self, RegistryError> {
        match configurer.finish() {
            Ok(injectors) => Ok(Self { injectors }),
            Err(errors) => Err(RegistryError::Aggregated { errors }),
        }
    }

    pub fn builder() -> ConfigurerImpl {
        ConfigurerImpl::new()
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        self.injectors.contains_key(&reference.id())
    }

    pub fn len(&self) -> usize {
        self.injectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.injectors.is_empty()
    }
}

impl Config for Bindings {
    fn get_injector(&self, reference: &Reference) -> Result<Arc<dyn Injector>, BindingError> {
        self.injectors
            .get(&reference.id())
            .cloned()
            .ok_or_else(|| BindingError::NotBound {
                reference: reference.clone(),
            })
    }
}

impl Debug for Bindings {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set()
            .entries(self.injectors.values().map(|injector| injector.reference()))
            .finish()
    }
}
