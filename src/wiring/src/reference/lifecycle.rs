use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::reference::ConfigurationError;

/// How long an object handed out by a container lives.
///
/// A [`Lifecycle::Singleton`] object is built at most once per container and
/// shared by every later request. A [`Lifecycle::Transient`] object is built
/// anew on every request, even when the same object graph needs it twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    Singleton,
    Transient,
}

impl Lifecycle {
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Transient => "transient",
        }
    }
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Lifecycle {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("singleton") {
            Ok(Self::Singleton)
        } else if value.eq_ignore_ascii_case("transient") {
            Ok(Self::Transient)
        } else {
            Err(ConfigurationError::InvalidLifecycle {
                value: s.to_string(),
            })
        }
    }
}
