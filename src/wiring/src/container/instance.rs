use std::any::TypeId;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::util::any::AsAny;

/// Any value a container can hand out.
pub trait Managed: AsAny + Send + Sync + 'static {}

impl<T> Managed for T where T: AsAny + Send + Sync + 'static {}

/// A type-erased shared object produced by an [`Injector`].
///
/// Cloning an [`Instance`] clones the handle, not the object, so two clones
/// are identical in the sense of [`Instance::ptr_eq`].
///
/// [`Injector`]: crate::injector::Injector
#[derive(Clone)]
pub struct Instance {
    inner: Arc<dyn Managed>,
}

impl Instance {
    pub fn new<T: Managed>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    pub fn from_arc<T: Managed>(value: Arc<T>) -> Self {
        Self { inner: value }
    }

    /// The [`TypeId`] of the object behind the handle.
    pub fn type_id(&self) -> TypeId {
        (*self.inner).concrete_type_id()
    }

    pub fn type_name(&self) -> &'static str {
        (*self.inner).type_name()
    }

    pub fn is<T: Managed>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Managed>(&self) -> Option<&T> {
        (*self.inner).as_any().downcast_ref::<T>()
    }

    pub fn downcast<T: Managed>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner)
            .into_any_arc()
            .downcast::<T>()
            .ok()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Instance")
            .field("type", &self.type_name())
            .finish_non_exhaustive()
    }
}
