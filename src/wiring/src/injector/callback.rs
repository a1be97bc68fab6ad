use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::{Instance, Managed};
use crate::dependency::DependencyList;
use crate::injector::argument::{self, Argument, ArgumentError, Arguments};
use crate::injector::{ArgumentSnafu, InjectError, Injector};
use crate::reference::Reference;

/// A specialized form of [`Fn`] that can be called with positional
/// [`Arguments`].
///
/// Functions and closures of `Fn(Arc<A1>, Arc<A2>, ...) -> Result<T, E> +
/// Send + Sync + 'static` where `Ai: Managed` are [`Callback`]s. Since `Fn`
/// cannot mutate what it captures, calling a callback has no effect on the
/// callback itself.
///
/// Due to the lack of support for functions of variable length parameters,
/// [`Callback`] is only implemented by functions whose arity is at most 16.
pub trait Callback<D>
where
    Self: Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    /// The successfully constructed object.
    type Constructed: Managed;

    /// The error occurred in object construction after all arguments are
    /// taken.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Takes the arguments in order and calls `self` with them.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is missing or has a wrong type.
    ///
    /// Returns an inner error [`Callback::Error`] wrapped in the outer [`Ok`]
    /// if the callback fails.
    fn call(
        &self,
        args: &mut Arguments,
    ) -> Result<Result<Self::Constructed, Self::Error>, ArgumentError>;
}

impl<F, T, E> Callback<()> for F
where
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
    T: Managed,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    type Constructed = T;

    type Error = E;

    fn call(
        &self,
        _args: &mut Arguments,
    ) -> Result<Result<Self::Constructed, Self::Error>, ArgumentError> {
        Ok(self())
    }
}

macro_rules! for_all_tuples {
    ($implementation:ident) => {
        $implementation!(D1);
        $implementation!(D1, D2);
        $implementation!(D1, D2, D3);
        $implementation!(D1, D2, D3, D4);
        $implementation!(D1, D2, D3, D4, D5);
        $implementation!(D1, D2, D3, D4, D5, D6);
        $implementation!(D1, D2, D3, D4, D5, D6, D7);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12, D13);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12, D13, D14);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12, D13, D14, D15);
        $implementation!(D1, D2, D3, D4, D5, D6, D7, D8, D9, D10, D11, D12, D13, D14, D15, D16);
    };
}

macro_rules! impl_callback {
    ($($dep:ident),*) => {
        #[allow(non_snake_case)]
        impl<F, T, E, $($dep,)*> Callback<($($dep,)*)> for F
        where
            F: Fn($(Arc<$dep>,)*) -> Result<T, E> + Send + Sync + 'static,
            T: Managed,
            E: Into<Box<dyn Error + Send + Sync>>,
            $($dep: Managed,)*
        {
            type Constructed = T;

            type Error = E;

            fn call(
                &self,
                args: &mut Arguments,
            ) -> Result<Result<Self::Constructed, Self::Error>, ArgumentError> {
                $(
                    let $dep = args.take::<$dep>()?;
                )*
                Ok(self($($dep,)*))
            }
        }
    };
}

for_all_tuples!(impl_callback);

/// An [`Injector`] which calls a [`Callback`] with positional arguments.
pub struct CallbackInjector<C, D>
where
    C: Callback<D>,
    D: Send + Sync + 'static,
{
    reference: Reference,
    callback: C,
    arguments: Vec<Argument>,
    _marker: PhantomData<fn() -> D>,
}

impl<C, D> CallbackInjector<C, D>
where
    C: Callback<D>,
    D: Send + Sync + 'static,
{
    pub fn new<I>(reference: Reference, callback: C, arguments: I) -> Self
    where
        I: IntoIterator<Item = Argument>,
    {
        Self {
            reference,
            callback,
            arguments: arguments.into_iter().collect(),
            _marker: PhantomData,
        }
    }
}

impl<C, D> Debug for CallbackInjector<C, D>
where
    C: Callback<D>,
    D: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CallbackInjector<C, D>")
            .field("reference", &self.reference)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl<C, D> Injector for CallbackInjector<C, D>
where
    C: Callback<D>,
    D: Send + Sync + 'static,
{
    fn reference(&self) -> &Reference {
        &self.reference
    }

    fn dependency_list(&self) -> DependencyList {
        argument::dependency_list_of(&self.arguments)
    }

    fn inject(&self, dependencies: DependencyList) -> Result<Instance, InjectError> {
        let mut args = Arguments::resolve(&self.reference, &self.arguments, &dependencies)?;
        match self.callback.call(&mut args).context(ArgumentSnafu {
            reference: self.reference.clone(),
        })? {
            Ok(object) => {
                args.ensure_consumed().context(ArgumentSnafu {
                    reference: self.reference.clone(),
                })?;
                Ok(Instance::new(object))
            }
            Err(err) => Err(InjectError::Construction {
                reference: self.reference.clone(),
                source: err.into(),
            }),
        }
    }
}
