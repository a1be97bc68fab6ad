use std::sync::Arc;

use crate::config::{Bindings, Config, RegistryError};
use crate::container::core::ContainerCore;
use crate::container::{ContainerOptions, Instance, Managed, ResolveError};
use crate::module::Module;
use crate::reference::{ClassId, Reference};

/// A cheaply cloneable handle to a dependency injection container.
///
/// Clones share the same configuration and singleton cache. A container may
/// be used from many threads; resolutions on one container are serialized.
#[derive(Clone)]
pub struct Container {
    core: Arc<ContainerCore>,
}

impl Container {
    pub fn new<C: Config>(config: C) -> Self {
        Self::with_options(config, ContainerOptions::default())
    }

    pub fn with_options<C: Config>(config: C, options: ContainerOptions) -> Self {
        Self::from_shared_config(Arc::new(config), options)
    }

    pub fn from_shared_config(config: Arc<dyn Config>, options: ContainerOptions) -> Self {
        Self {
            core: Arc::new(ContainerCore::new(config, options)),
        }
    }

    /// Creates a container over the [`Bindings`] declared by `module`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bindings can't be collected. See
    /// [`Bindings::init`].
    pub fn init<M: Module>(module: M) -> Result<Self, RegistryError> {
        Bindings::init(module).map(Self::new)
    }

    /// Returns the object identified by `reference`, building it and
    /// everything it depends on first.
    ///
    /// # Errors
    ///
    /// Returns an error if anything in the object graph is unbound, circular,
    /// misconfigured or fails to build. Nothing is cached for a failed
    /// resolution.
    pub fn get(&self, reference: &Reference) -> Result<Instance, ResolveError> {
        self.core.get(reference)
    }

    /// Same as [`Container::get`], downcasting the object to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::TypeMismatch`] if `T` is not the class of
    /// `reference`, or any error of [`Container::get`].
    pub fn resolve<T: Managed>(&self, reference: &Reference) -> Result<Arc<T>, ResolveError> {
        let instance = self.get(reference)?;
        instance
            .downcast::<T>()
            .ok_or_else(|| ResolveError::TypeMismatch {
                reference: reference.clone(),
                expected: ClassId::of::<T>().name(),
                found: instance.type_name(),
            })
    }

    pub fn is_cached(&self, reference: &Reference) -> bool {
        self.core.is_cached(reference)
    }

    pub fn cached_singletons(&self) -> usize {
        self.core.cached_singletons()
    }

    pub fn options(&self) -> ContainerOptions {
        self.core.options()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use crate::config::{BindingError, MockConfig};
    use crate::injector::{Argument, CallbackInjector, FauxInjector, InjectError, Injector};

    use super::*;

    struct Engine {
        serial: usize,
    }

    struct Car {
        engine: Arc<Engine>,
    }

    fn engine() -> Reference {
        Reference::singleton::<Engine>("Default")
    }

    fn car() -> Reference {
        Reference::transient::<Car>("Default")
    }

    fn mock_config(built: Arc<AtomicUsize>) -> MockConfig {
        let engine_injector: Arc<dyn Injector> = Arc::new(CallbackInjector::new(
            engine(),
            move || {
                let serial = built.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(Engine { serial })
            },
            [],
        ));
        let car_injector: Arc<dyn Injector> = Arc::new(CallbackInjector::new(
            car(),
            |engine: Arc<Engine>| Ok::<_, Infallible>(Car { engine }),
            [Argument::from(engine())],
        ));

        let mut config = MockConfig::new();
        config.expect_get_injector().returning(move |reference| {
            if reference == &engine() {
                Ok(Arc::clone(&engine_injector))
            } else if reference == &car() {
                Ok(Arc::clone(&car_injector))
            } else {
                Err(BindingError::NotBound {
                    reference: reference.clone(),
                })
            }
        });
        config
    }

    #[test]
    fn container_get_succeeds() {
        let built = Arc::new(AtomicUsize::new(0));
        let container = Container::new(mock_config(Arc::clone(&built)));

        let first = container.resolve::<Car>(&car()).unwrap();
        let second = container.resolve::<Car>(&car()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first.engine, &second.engine));
        assert_eq!(first.engine.serial, 0);
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert!(container.is_cached(&engine()));
        assert!(!container.is_cached(&car()));
        assert_eq!(container.cached_singletons(), 1);
    }

    #[test]
    fn container_get_fails_when_reference_is_not_bound() {
        let container = Container::new(mock_config(Arc::new(AtomicUsize::new(0))));
        let reference = Reference::transient::<Car>("Sports");

        assert!(matches!(
            container.get(&reference),
            Err(ResolveError::Binding {
                source: BindingError::NotBound { .. },
                ..
            })
        ));
    }

    #[test]
    fn container_resolve_fails_when_type_mismatches() {
        let container = Container::new(mock_config(Arc::new(AtomicUsize::new(0))));

        assert!(matches!(
            container.resolve::<Engine>(&car()),
            Err(ResolveError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn container_get_fails_when_injector_builds_wrong_type() {
        let mut config = MockConfig::new();
        config.expect_get_injector().returning(|reference| {
            Ok(Arc::new(CallbackInjector::new(
                reference.clone(),
                || Ok::<_, Infallible>(String::from("not an engine")),
                [],
            )))
        });
        let container = Container::new(config);

        assert!(matches!(
            container.get(&engine()),
            Err(ResolveError::TypeMismatch { found, .. }) if found.ends_with("String")
        ));
        assert!(!container.is_cached(&engine()));
    }

    #[test]
    fn container_get_fails_when_injection_fails() {
        let mut config = MockConfig::new();
        config.expect_get_injector().returning(|reference| {
            Ok(Arc::new(CallbackInjector::new(
                reference.clone(),
                || Err::<Engine, _>("broken"),
                [],
            )))
        });
        let container = Container::new(config);

        assert!(matches!(
            container.get(&engine()),
            Err(ResolveError::Injection {
                source: InjectError::Construction { .. },
            })
        ));
        assert_eq!(container.cached_singletons(), 0);
    }

    #[test]
    fn container_get_returns_precomputed_instance() {
        let engine_instance = Instance::new(Engine { serial: 9 });
        let injector: Arc<dyn Injector> =
            Arc::new(FauxInjector::new(engine(), engine_instance.clone()).unwrap());
        let mut config = MockConfig::new();
        config
            .expect_get_injector()
            .times(1)
            .returning(move |_| Ok(Arc::clone(&injector)));
        let container = Container::new(config);

        assert!(container.get(&engine()).unwrap().ptr_eq(&engine_instance));
        assert!(container.get(&engine()).unwrap().ptr_eq(&engine_instance));
    }

    #[test]
    fn container_get_succeeds_when_shared_across_threads() {
        let built = Arc::new(AtomicUsize::new(0));
        let container = Container::new(mock_config(Arc::clone(&built)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let container = container.clone();
                thread::spawn(move || container.resolve::<Car>(&car()).unwrap())
            })
            .collect();
        let cars: Vec<Arc<Car>> = handles
            .into_iter()
            .map(|h| h.join().expect("Each thread should not `panic!()`"))
            .collect();

        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert!(cars
            .windows(2)
            .all(|pair| Arc::ptr_eq(&pair[0].engine, &pair[1].engine)));
    }

    #[test]
    fn container_options_are_kept() {
        let options = ContainerOptions::new().with_max_stack_size(8);
        let container = Container::with_options(MockConfig::new(), options);

        assert_eq!(container.options().max_stack_size(), 8);
        assert_eq!(container.clone().options(), options);
    }
}
