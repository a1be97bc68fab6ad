use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use snafu::prelude::*;

use crate::container::{Instance, Managed};
use crate::dependency::DependencyList;
use crate::injector::argument::{self, Argument, ArgumentError, Arguments};
use crate::injector::{ArgumentSnafu, InjectError, Injector};
use crate::reference::Reference;

/// A type that can be built from positional [`Arguments`].
///
/// Usually, you don't need to implement the [`Construct`] trait manually,
/// because the [`constructor`] macro does it for an `impl` block with an
/// `#[inject]` associated function. A manual implementation looks like this:
///
/// ```rust
/// # use std::sync::Arc;
/// # use std::convert::Infallible;
/// # use wiring::injector::{ArgumentError, Arguments, Construct};
/// #
/// struct Engine;
///
/// struct Car {
///     engine: Arc<Engine>,
///     doors: Arc<u8>,
/// }
///
/// impl Construct for Car {
///     type Constructed = Self;
///
///     type Error = Infallible;
///
///     fn construct(args: &mut Arguments) -> Result<Result<Self, Self::Error>, ArgumentError> {
///         let engine = args.take()?;
///         let doors = args.take()?;
///         Ok(Ok(Self { engine, doors }))
///     }
///
///     fn post_process(self) -> Self::Constructed {
///         self
///     }
/// }
/// ```
///
/// [`constructor`]: crate::constructor
pub trait Construct: Managed + Sized {
    /// The object handed out by the container. This can be not only `Self`,
    /// but also some boxed `Self`, such as `Box<dyn Trait>`.
    type Constructed: Managed;

    /// The error occurred in object construction after all arguments are
    /// taken.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Takes the arguments in order and creates the object.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is missing or has a wrong type.
    ///
    /// Returns an inner error [`Construct::Error`] wrapped in the outer [`Ok`]
    /// if the object construction fails.
    fn construct(args: &mut Arguments) -> Result<Result<Self, Self::Error>, ArgumentError>;

    /// Converts `self` to [`Construct::Constructed`].
    fn post_process(self) -> Self::Constructed;
}

/// An [`Injector`] which calls the [`Construct`] implementation of `C` with
/// positional arguments.
pub struct ConstructorInjector<C>
where
    C: Construct,
{
    reference: Reference,
    arguments: Vec<Argument>,
    _marker: PhantomData<fn() -> C>,
}

impl<C> ConstructorInjector<C>
where
    C: Construct,
{
    pub fn new<I>(reference: Reference, arguments: I) -> Self
    where
        I: IntoIterator<Item = Argument>,
    {
        Self {
            reference,
            arguments: arguments.into_iter().collect(),
            _marker: PhantomData,
        }
    }
}

impl<C> Debug for ConstructorInjector<C>
where
    C: Construct,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ConstructorInjector<C>")
            .field("reference", &self.reference)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl<C> Injector for ConstructorInjector<C>
where
    C: Construct,
{
    fn reference(&self) -> &Reference {
        &self.reference
    }

    fn dependency_list(&self) -> DependencyList {
        argument::dependency_list_of(&self.arguments)
    }

    fn inject(&self, dependencies: DependencyList) -> Result<Instance, InjectError> {
        let mut args = Arguments::resolve(&self.reference, &self.arguments, &dependencies)?;
        match C::construct(&mut args).context(ArgumentSnafu {
            reference: self.reference.clone(),
        })? {
            Ok(object) => {
                args.ensure_consumed().context(ArgumentSnafu {
                    reference: self.reference.clone(),
                })?;
                Ok(Instance::new(object.post_process()))
            }
            Err(err) => Err(InjectError::Construction {
                reference: self.reference.clone(),
                source: err.into(),
            }),
        }
    }
}
