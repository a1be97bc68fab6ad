mod core;
mod handle;
mod instance;
mod options;
mod stack;

use snafu::prelude::*;

use crate::config::BindingError;
use crate::dependency::DependencyError;
use crate::injector::InjectError;
use crate::reference::Reference;

pub use handle::Container;
pub use instance::{Instance, Managed};
pub use options::ContainerOptions;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum ResolveError {
    #[snafu(display("could not find how to build {reference}"))]
    #[non_exhaustive]
    Binding {
        reference: Reference,
        source: BindingError,
    },
    #[snafu(display(
        "could not resolve {requested} required by {required_by} while {requested} is still being resolved"
    ))]
    #[non_exhaustive]
    CircularDependency {
        requested: Reference,
        required_by: Reference,
    },
    #[snafu(display("the injector of {reference} built a {found} instead of a {expected}"))]
    #[non_exhaustive]
    TypeMismatch {
        reference: Reference,
        expected: &'static str,
        found: &'static str,
    },
    #[snafu(display("could not hand {reference} over to the object depending on it"))]
    #[non_exhaustive]
    InvalidDependency {
        reference: Reference,
        source: DependencyError,
    },
    #[snafu(display("could not build {}", source.reference()))]
    #[non_exhaustive]
    Injection { source: InjectError },
    #[snafu(display("could not resolve {reference} within {limit} pending objects"))]
    #[non_exhaustive]
    StackLimitExceeded { reference: Reference, limit: usize },
}
