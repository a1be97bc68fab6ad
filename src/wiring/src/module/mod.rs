pub mod dsl;

use std::any;
use std::error::Error;

use tracing::debug;

use crate::config::Configurer;

pub use dsl::bind;

/// A unit of binding declarations.
///
/// A module reports its bindings to a [`Configurer`]. When
/// [`Module::configure`] fails, [`Module::setup`] records the failure under
/// [`Module::name`] and the bindings declared so far stay registered, so
/// every problem of a configuration surfaces at once.
pub trait Module: Send + Sync + 'static {
    fn setup(&self, configurer: &mut dyn Configurer) {
        debug!(module = self.name(), "configuring module");
        if let Err(err) = self.configure(configurer) {
            configurer.report_module_error(self.name(), err);
        }
    }

    fn configure(&self, configurer: &mut dyn Configurer)
        -> Result<(), Box<dyn Error + Send + Sync>>;

    fn name(&self) -> &'static str {
        any::type_name::<Self>()
    }
}

/// An ordered group of [`Module`]s that is itself a module.
pub struct Configuration {
    name: &'static str,
    modules: Vec<Box<dyn Module>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::named(any::type_name::<Self>())
    }

    /// Creates an empty group reported as `name` in logs.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            modules: Vec::new(),
        }
    }

    pub fn with<M: Module>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Appends the modules of `other` after the modules of `self`.
    pub fn compose(mut self, other: Configuration) -> Self {
        self.modules.extend(other.modules);
        self
    }

    /// Names of the direct members, in setup order.
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|module| module.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Configuration {
    fn configure(
        &self,
        configurer: &mut dyn Configurer,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        for module in &self.modules {
            module.setup(configurer);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Bindings, RegistryError};
    use crate::reference::Reference;

    use super::*;

    struct Numbers;

    impl Module for Numbers {
        fn configure(
            &self,
            configurer: &mut dyn Configurer,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            bind::<i32>().singleton().to_instance(1).set_on(configurer);
            Ok(())
        }
    }

    struct Words;

    impl Module for Words {
        fn configure(
            &self,
            configurer: &mut dyn Configurer,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            bind::<&'static str>()
                .singleton()
                .to_instance("one")
                .set_on(configurer);
            Ok(())
        }
    }

    struct HalfDone;

    impl Module for HalfDone {
        fn configure(
            &self,
            configurer: &mut dyn Configurer,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            bind::<u8>().singleton().to_instance(8).set_on(configurer);
            Err("missing settings file".into())
        }

        fn name(&self) -> &'static str {
            "half-done"
        }
    }

    #[test]
    fn configuration_compose_succeeds() {
        let configuration = Configuration::named("app")
            .with(Numbers)
            .compose(Configuration::named("text").with(Words));

        assert_eq!(configuration.name(), "app");
        assert_eq!(configuration.len(), 2);
        assert!(configuration.module_names()[0].ends_with("Numbers"));

        let bindings = Bindings::init(configuration).unwrap();
        assert_eq!(bindings.len(), 2);
        assert!(bindings.contains(&Reference::singleton::<i32>("Default")));
        assert!(bindings.contains(&Reference::singleton::<&'static str>("Default")));
    }

    #[test]
    fn configuration_fails_when_modules_overlap() {
        let configuration = Configuration::new().with(Numbers).with(Numbers);

        assert!(matches!(
            Bindings::init(configuration),
            Err(RegistryError::Aggregated { errors }) if errors.len() == 1
        ));
    }

    #[test]
    fn module_setup_reports_failure_under_its_name() {
        let configuration = Configuration::new().with(HalfDone).with(Words);

        assert!(matches!(
            Bindings::init(configuration),
            Err(RegistryError::Aggregated { errors })
                if matches!(&errors[..], [RegistryError::ModuleInner { module: "half-done", .. }])
        ));
    }
}
