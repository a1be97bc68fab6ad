mod lifecycle;

use std::any::{self, TypeId};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::Managed;
use crate::util::any::canonical_type_name;

pub use lifecycle::Lifecycle;

/// The configuration variant used when none is given.
pub const DEFAULT_CONFIG: &str = "Default";

/// The identity of a managed type.
///
/// Equality and hashing only look at the [`TypeId`]; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct ClassId {
    id: TypeId,
    name: &'static str,
}

impl ClassId {
    pub fn of<T: Managed>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: canonical_type_name(any::type_name::<T>()),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for ClassId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name)
    }
}

impl Display for ClassId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name)
    }
}

/// An immutable request for one object: which type, which configuration
/// variant of it, and how long it lives.
///
/// Two references built from the same three fields are interchangeable and
/// share the same [`ReferenceId`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    class: ClassId,
    config: Arc<str>,
    lifecycle: Lifecycle,
}

impl Reference {
    pub fn new<T: Managed>(config: &str, lifecycle: Lifecycle) -> Self {
        Self {
            class: ClassId::of::<T>(),
            config: canonical_config(config),
            lifecycle,
        }
    }

    pub fn of<T: Managed>(lifecycle: Lifecycle) -> Self {
        Self::new::<T>(DEFAULT_CONFIG, lifecycle)
    }

    pub fn singleton<T: Managed>(config: &str) -> Self {
        Self::new::<T>(config, Lifecycle::Singleton)
    }

    pub fn transient<T: Managed>(config: &str) -> Self {
        Self::new::<T>(config, Lifecycle::Transient)
    }

    /// Builds a reference whose lifecycle comes from a textual setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidLifecycle`] if `lifecycle` is
    /// neither `singleton` nor `transient`.
    pub fn parse<T: Managed>(config: &str, lifecycle: &str) -> Result<Self, ConfigurationError> {
        Ok(Self::new::<T>(config, lifecycle.parse()?))
    }

    pub fn id(&self) -> ReferenceId {
        ReferenceId {
            target: self.class.type_id(),
            config: Arc::clone(&self.config),
            lifecycle: self.lifecycle,
        }
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn class_name(&self) -> &'static str {
        self.class.name()
    }

    pub fn config_name(&self) -> &str {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_singleton(&self) -> bool {
        self.lifecycle == Lifecycle::Singleton
    }
}

impl Debug for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}#{}@{}", self.class, self.config, self.lifecycle)
    }
}

fn canonical_config(config: &str) -> Arc<str> {
    let config = config.trim();
    if config.is_empty() {
        Arc::from(DEFAULT_CONFIG)
    } else {
        Arc::from(config)
    }
}

/// The stable composite key of a [`Reference`], used wherever references
/// index a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceId {
    target: TypeId,
    config: Arc<str>,
    lifecycle: Lifecycle,
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[snafu(display("unknown lifecycle {value:?}, expected `singleton` or `transient`"))]
    #[non_exhaustive]
    InvalidLifecycle { value: String },
    #[snafu(display("could not bind a precomputed instance to {reference} which is not a singleton"))]
    #[non_exhaustive]
    TransientInstance { reference: Reference },
}
