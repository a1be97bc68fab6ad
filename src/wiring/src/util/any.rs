use std::any::{self, Any, TypeId};
use std::sync::Arc;

pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    fn concrete_type_id(&self) -> TypeId;

    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    #[inline]
    fn concrete_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        canonical_type_name(any::type_name::<T>())
    }
}

/// Strips the leading path separator some tools prepend to fully qualified
/// names, so that the same type always renders the same way.
pub fn canonical_type_name(name: &'static str) -> &'static str {
    name.trim_start_matches("::")
}
