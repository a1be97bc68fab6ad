#![allow(clippy::new_without_default)]

extern crate self as wiring;

pub mod config;
pub mod container;
pub mod dependency;
pub mod injector;
pub mod module;
pub mod reference;
mod util;

pub use wiring_derive::constructor;

pub mod prelude {
    pub use crate::config::{Bindings, Config, Configurer, RegistryError};
    pub use crate::constructor;
    pub use crate::container::{Container, ContainerOptions, Instance, ResolveError};
    pub use crate::injector::{Argument, Injector, Provider};
    pub use crate::module::{bind, Configuration, Module};
    pub use crate::reference::{Lifecycle, Reference};
}
