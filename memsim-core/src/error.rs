use thiserror::Error;

use crate::alloc::Handle;

/// Refusals raised by a block source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeapError {
    #[error("request of {requested} bytes exceeds remaining budget of {available} bytes")]
    LimitExceeded { requested: u64, available: u64 },

    #[error("zero-size allocations are disabled")]
    ZeroSize,

    #[error("simulated address space exhausted")]
    AddressSpaceExhausted,

    #[error("handle {0} is not live")]
    UnknownHandle(Handle),
}

/// Registry operation failures. None of these leave the registry modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("maximum number of memory blocks ({capacity}) reached")]
    CapacityExceeded { capacity: usize },

    #[error("invalid index {index} (active blocks: {count})")]
    InvalidIndex { index: i64, count: usize },

    #[error("memory allocation failed: {0}")]
    AllocationFailed(#[source] HeapError),

    #[error("block source out of sync with registry: {0}")]
    Corrupted(#[source] HeapError),
}
