use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use snafu::prelude::*;

use crate::container::{Instance, Managed};
use crate::dependency::DependencyList;
use crate::injector::{InjectError, Injector, InvalidDependencySnafu};
use crate::reference::Reference;

/// A managed object which hands out another object on request.
///
/// A provider is itself resolved by a container like any other object, so it
/// can have dependencies of its own. A [`ProviderInjector`] then asks it for
/// the object it was bound to.
pub trait Provider: Managed {
    /// The object handed out by [`Provider::get`].
    type Output: Managed;

    /// The error occurred when the provider fails to hand out an object.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Returns the provided object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object can't be provided.
    fn get(&self) -> Result<Self::Output, Self::Error>;
}

/// An [`Injector`] which resolves a provider of type `P` and asks it for the
/// object.
///
/// The provider reference is the only declared dependency.
pub struct ProviderInjector<P>
where
    P: Provider,
{
    reference: Reference,
    provider: Reference,
    _marker: PhantomData<fn() -> P>,
}

impl<P> ProviderInjector<P>
where
    P: Provider,
{
    pub fn new(reference: Reference, provider: Reference) -> Self {
        Self {
            reference,
            provider,
            _marker: PhantomData,
        }
    }

    pub fn provider(&self) -> &Reference {
        &self.provider
    }
}

impl<P> Debug for ProviderInjector<P>
where
    P: Provider,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProviderInjector<P>")
            .field("reference", &self.reference)
            .field("provider", &self.provider)
            .finish()
    }
}

impl<P> Injector for ProviderInjector<P>
where
    P: Provider,
{
    fn reference(&self) -> &Reference {
        &self.reference
    }

    fn dependency_list(&self) -> DependencyList {
        DependencyList::new([self.provider.clone()])
    }

    fn inject(&self, dependencies: DependencyList) -> Result<Instance, InjectError> {
        let Some(instance) = dependencies
            .instantiated_dependency(&self.provider)
            .context(InvalidDependencySnafu {
                reference: self.reference.clone(),
            })?
        else {
            return Err(InjectError::Unfulfilled {
                reference: self.reference.clone(),
                dependency: self.provider.clone(),
            });
        };

        let Some(provider) = instance.downcast_ref::<P>() else {
            return Err(InjectError::MissingCapability {
                reference: self.reference.clone(),
                provider: self.provider.clone(),
            });
        };

        match provider.get() {
            Ok(object) => Ok(Instance::new(object)),
            Err(err) => Err(InjectError::Construction {
                reference: self.reference.clone(),
                source: err.into(),
            }),
        }
    }
}
