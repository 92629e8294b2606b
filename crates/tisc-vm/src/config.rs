//! Machine configuration.

/// Resource limits for one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Most values the stack may hold. A push beyond it is a `BoundsFault`.
    pub max_stack_depth: usize,
    /// Size of data memory in words.
    pub memory_size: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: 1024,
            memory_size: 1024,
        }
    }
}

impl VmConfig {
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    pub fn with_memory_size(mut self, words: usize) -> Self {
        self.memory_size = words;
        self
    }
}
