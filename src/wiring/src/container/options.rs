/// Tunables of a [`Container`].
///
/// [`Container`]: crate::container::Container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerOptions {
    max_stack_size: usize,
}

impl ContainerOptions {
    pub const DEFAULT_MAX_STACK_SIZE: usize = 1 << 16;

    pub fn new() -> Self {
        Self {
            max_stack_size: Self::DEFAULT_MAX_STACK_SIZE,
        }
    }

    /// Limits how many objects may be pending at once during one resolution.
    /// Acyclic but pathologically deep graphs fail instead of exhausting
    /// memory.
    pub fn with_max_stack_size(mut self, max_stack_size: usize) -> Self {
        self.max_stack_size = max_stack_size.max(1);
        self
    }

    pub fn max_stack_size(&self) -> usize {
        self.max_stack_size
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self::new()
    }
}
