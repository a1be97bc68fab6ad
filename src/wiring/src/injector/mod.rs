pub mod argument;
pub mod callback;
pub mod constructor;
pub mod faux;
pub mod provider;

use std::error::Error;

use snafu::prelude::*;

use crate::container::Instance;
use crate::dependency::{DependencyError, DependencyList};
use crate::reference::Reference;

pub use argument::{Argument, ArgumentError, Arguments};
pub use callback::{Callback, CallbackInjector};
pub use constructor::{Construct, ConstructorInjector};
pub use faux::FauxInjector;
pub use provider::{Provider, ProviderInjector};

/// A strategy which builds the object identified by one [`Reference`].
///
/// An [`Injector`] never fetches its own dependencies. It declares them
/// through [`Injector::dependency_list`], and a container hands the list back
/// to [`Injector::inject`] once every declared reference has been resolved.
///
/// Injectors are shared by whatever configuration produced them, so each call
/// to [`Injector::dependency_list`] must return a fresh, unresolved list.
pub trait Injector: Send + Sync + 'static {
    /// Returns the reference of the object this injector builds.
    fn reference(&self) -> &Reference;

    /// Returns a new list declaring every reference the object depends on.
    fn dependency_list(&self) -> DependencyList;

    /// Builds the object from a fulfilled dependency list.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency is missing from `dependencies` or the
    /// object construction fails.
    fn inject(&self, dependencies: DependencyList) -> Result<Instance, InjectError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum InjectError {
    #[snafu(display("could not build {reference} before its dependency {dependency} is resolved"))]
    #[non_exhaustive]
    Unfulfilled {
        reference: Reference,
        dependency: Reference,
    },
    #[snafu(display("could not read the dependencies of {reference} from a list built for another injector"))]
    #[non_exhaustive]
    InvalidDependency {
        reference: Reference,
        source: DependencyError,
    },
    #[snafu(display("could not pass the arguments to {reference}"))]
    #[non_exhaustive]
    Argument {
        reference: Reference,
        source: ArgumentError,
    },
    #[snafu(display("could not construct the object {reference}"))]
    #[non_exhaustive]
    Construction {
        reference: Reference,
        source: Box<dyn Error + Send + Sync>,
    },
    #[snafu(display(
        "the provider {provider} resolved for {reference} does not expose the `get()` capability"
    ))]
    #[non_exhaustive]
    MissingCapability {
        reference: Reference,
        provider: Reference,
    },
}

impl InjectError {
    /// The reference whose injection failed.
    pub fn reference(&self) -> &Reference {
        match self {
            Self::Unfulfilled { reference, .. }
            | Self::InvalidDependency { reference, .. }
            | Self::Argument { reference, .. }
            | Self::Construction { reference, .. }
            | Self::MissingCapability { reference, .. } => reference,
        }
    }
}
