mod bindings;
mod configurer;

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use snafu::prelude::*;

use crate::injector::Injector;
use crate::reference::{ConfigurationError, Reference};

pub use bindings::Bindings;
pub use configurer::{Configurer, ConfigurerImpl, TypedConfigurer};

/// The binding configuration a container resolves against.
///
/// A [`Config`] maps each [`Reference`] to the [`Injector`] able to build it.
/// How bindings are declared is up to the implementation; [`Bindings`] is a
/// static map filled by [`Module`]s.
///
/// [`Module`]: crate::module::Module
#[cfg_attr(test, mockall::automock)]
pub trait Config: Send + Sync + 'static {
    /// Returns the injector bound to `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::NotBound`] if nothing is bound to `reference`.
    fn get_injector(&self, reference: &Reference) -> Result<Arc<dyn Injector>, BindingError>;
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum BindingError {
    #[snafu(display("could not find any injector bound to {reference}"))]
    #[non_exhaustive]
    NotBound { reference: Reference },
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum RegistryError {
    #[snafu(display("the reference {reference} is already bound"))]
    #[non_exhaustive]
    KeyDuplicated { reference: Reference },
    #[snafu(display("a binding is misconfigured"))]
    #[non_exhaustive]
    Configuration { source: ConfigurationError },
    #[snafu(display("module {module} fails to setup the configuration"))]
    #[non_exhaustive]
    ModuleInner {
        module: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
    #[snafu(display("aggregated registry errors:\n{}", AggregatedDisplayer::new(errors)))]
    Aggregated { errors: Vec<RegistryError> },
}

struct AggregatedDisplayer<'a> {
    errors: &'a [RegistryError],
}

impl<'a> AggregatedDisplayer<'a> {
    fn new(errors: &'a [RegistryError]) -> Self {
        Self { errors }
    }
}

impl Display for AggregatedDisplayer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "{:4}: {}", i + 1, error)?;
            if let Some(source) = error.source() {
                writeln!(f, "      caused by: {source}")?;
            }
        }
        Ok(())
    }
}
