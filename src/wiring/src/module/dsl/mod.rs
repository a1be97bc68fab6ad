mod binding;

use crate::container::Managed;

pub use binding::{InjectorBinding, ReferenceBinding};

/// Starts a binding of `T` under the default configuration variant, as a
/// transient.
pub fn bind<T>() -> ReferenceBinding<T>
where
    T: Managed,
{
    ReferenceBinding::new()
}
