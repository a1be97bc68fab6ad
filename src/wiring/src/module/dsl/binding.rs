use std::marker::PhantomData;

use crate::config::{Configurer, TypedConfigurer};
use crate::container::Managed;
use crate::injector::{
    Argument, Callback, CallbackInjector, Construct, ConstructorInjector, FauxInjector, Injector,
    Provider, ProviderInjector,
};
use crate::reference::{ConfigurationError, Lifecycle, Reference, DEFAULT_CONFIG};

/// The first half of a binding: which reference is being bound.
pub struct ReferenceBinding<T>
where
    T: Managed,
{
    config: String,
    lifecycle: Lifecycle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ReferenceBinding<T>
where
    T: Managed,
{
    pub(super) fn new() -> Self {
        Self {
            config: String::from(DEFAULT_CONFIG),
            lifecycle: Lifecycle::Transient,
            _marker: PhantomData,
        }
    }

    pub fn named(mut self, config: &str) -> Self {
        self.config = config.to_string();
        self
    }

    pub fn in_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn singleton(self) -> Self {
        self.in_lifecycle(Lifecycle::Singleton)
    }

    pub fn transient(self) -> Self {
        self.in_lifecycle(Lifecycle::Transient)
    }

    pub fn reference(&self) -> Reference {
        Reference::new::<T>(&self.config, self.lifecycle)
    }

    pub fn to_constructor<C, I>(self, arguments: I) -> InjectorBinding<ConstructorInjector<C>>
    where
        C: Construct<Constructed = T>,
        I: IntoIterator<Item = Argument>,
    {
        InjectorBinding::new(Ok(ConstructorInjector::new(self.reference(), arguments)))
    }

    pub fn to_callback<C, D, I>(
        self,
        callback: C,
        arguments: I,
    ) -> InjectorBinding<CallbackInjector<C, D>>
    where
        C: Callback<D, Constructed = T>,
        D: Send + Sync + 'static,
        I: IntoIterator<Item = Argument>,
    {
        InjectorBinding::new(Ok(CallbackInjector::new(
            self.reference(),
            callback,
            arguments,
        )))
    }

    pub fn to_provider<P>(self, provider: Reference) -> InjectorBinding<ProviderInjector<P>>
    where
        P: Provider<Output = T>,
    {
        InjectorBinding::new(Ok(ProviderInjector::new(self.reference(), provider)))
    }

    /// Binds a precomputed object. The binding is rejected when it is set on a
    /// configurer unless the reference is a singleton.
    pub fn to_instance(self, value: T) -> InjectorBinding<FauxInjector> {
        InjectorBinding::new(FauxInjector::of(self.reference(), value))
    }
}

/// A complete binding, ready to be set on a [`Configurer`].
pub struct InjectorBinding<I>
where
    I: Injector,
{
    injector: Result<I, ConfigurationError>,
}

impl<I> InjectorBinding<I>
where
    I: Injector,
{
    fn new(injector: Result<I, ConfigurationError>) -> Self {
        Self { injector }
    }

    pub fn into_injector(self) -> Result<I, ConfigurationError> {
        self.injector
    }

    pub fn set_on(self, configurer: &mut dyn Configurer) {
        match self.injector {
            Ok(injector) => configurer.register(injector),
            Err(err) => configurer.report_configuration_error(err),
        }
    }
}
