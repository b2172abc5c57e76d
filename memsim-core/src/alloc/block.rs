use std::fmt;

/// Opaque identifier for a simulated allocation.
///
/// The wrapped value is a simulated address; it is only meaningful for display
/// and for handing back to the block source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u64);

impl Handle {
    pub(crate) fn from_address(address: u64) -> Self {
        Self(address)
    }

    pub fn address(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A live simulated allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub handle: Handle,
    pub size: u64,
}

impl Block {
    pub fn new(handle: Handle, size: u64) -> Self {
        Self { handle, size }
    }
}
