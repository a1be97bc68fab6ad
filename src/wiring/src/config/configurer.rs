use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use crate::config::RegistryError;
use crate::injector::Injector;
use crate::reference::{ConfigurationError, ReferenceId};

/// A sink for binding declarations.
///
/// Errors never abort a configuration half way. They are collected and
/// reported all at once when the configuration is finished.
pub trait Configurer: Send + Sync + 'static {
    /// Binds `injector` to the reference it builds.
    fn dyn_register(&mut self, injector: Arc<dyn Injector>);

    fn report_configuration_error(&mut self, err: ConfigurationError);

    fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>);
}

pub trait TypedConfigurer: Configurer {
    fn register<I>(&mut self, injector: I)
    where
        I: Injector,
    {
        self.dyn_register(Arc::new(injector));
    }
}

impl<T: Configurer + ?Sized> TypedConfigurer for T {}

#[derive(Default)]
pub struct ConfigurerImpl {
    injectors: HashMap<ReferenceId, Arc<dyn Injector>>,
    errors: Vec<RegistryError>,
}

impl ConfigurerImpl {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn finish(self) -> Result<HashMap<ReferenceId, Arc<dyn Injector>>, Vec<RegistryError>> {
        if self.errors.is_empty() {
            Ok(self.injectors)
        } else {
            Err(self.errors)
        }
    }
}

impl Configurer for ConfigurerImpl {
    fn dyn_register(&mut self, injector: Arc<dyn Injector>) {
        let id = injector.reference().id();
        if self.injectors.contains_key(&id) {
            self.errors.push(RegistryError::KeyDuplicated {
                reference: injector.reference().clone(),
            });
        } else {
            self.injectors.insert(id, injector);
        }
    }

    fn report_configuration_error(&mut self, err: ConfigurationError) {
        self.errors
            .push(RegistryError::Configuration { source: err });
    }

    fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>) {
        self.errors.push(RegistryError::ModuleInner {
            module,
            source: err,
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::injector::FauxInjector;
    use crate::reference::Reference;

    use super::*;

    fn answer(config: &str) -> FauxInjector {
        FauxInjector::of(Reference::singleton::<i32>(config), 42i32).unwrap()
    }

    #[test]
    fn configurer_impl_register_succeeds() {
        let mut configurer = ConfigurerImpl::new();
        configurer.register(answer("a"));
        configurer.register(answer("b"));

        let map = configurer.finish().unwrap();
        assert!(map.contains_key(&Reference::singleton::<i32>("a").id()));
        assert!(map.contains_key(&Reference::singleton::<i32>("b").id()));
    }

    #[test]
    fn configurer_impl_finish_fails_when_key_is_duplicated() {
        let mut configurer = ConfigurerImpl::new();
        configurer.register(answer("a"));
        configurer.register(answer("a"));

        let errs = configurer.finish().err().unwrap();
        assert!(matches!(
            errs.first().unwrap(),
            RegistryError::KeyDuplicated { .. }
        ));
    }

    #[test]
    fn configurer_impl_finish_fails_when_other_error_reported() {
        let mut configurer = ConfigurerImpl::new();
        configurer.register(answer("a"));
        configurer.report_module_error("test", "whatever".into());
        configurer.report_configuration_error(ConfigurationError::InvalidLifecycle {
            value: String::from("forever"),
        });

        let errs = configurer.finish().err().unwrap();
        assert_eq!(errs.len(), 2);
        assert!(matches!(errs[0], RegistryError::ModuleInner { .. }));
        assert!(matches!(errs[1], RegistryError::Configuration { .. }));
    }
}
