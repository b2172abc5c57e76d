//! ## memsim-core::alloc::heap
//! **Simulated block source**
//!
//! `BlockSource` is the seam where a real allocator would sit. `SimulatedHeap`
//! bumps a word-aligned address cursor forward for every grant and enforces a
//! byte budget; no memory is actually reserved.

use std::collections::BTreeMap;
use std::mem;

use tracing::trace;

use crate::alloc::block::Handle;
use crate::error::HeapError;

/// Grants and reclaims handles for simulated allocations.
pub trait BlockSource {
    /// Reserves `size` bytes, returning the handle standing in for the address.
    fn reserve(&mut self, size: u64) -> Result<Handle, HeapError>;

    /// Returns a previously reserved handle, yielding the size it was granted with.
    fn release(&mut self, handle: Handle) -> Result<u64, HeapError>;

    /// Bytes currently granted and not yet released.
    fn in_use(&self) -> u64;
}

const WORD: u64 = mem::size_of::<usize>() as u64;

/// Rounds `value` up to the machine word, `None` on overflow.
fn align_up(value: u64) -> Option<u64> {
    Some(value.checked_add(WORD - 1)? & !(WORD - 1))
}

/// Bump-style simulated heap.
///
/// Addresses are never reused, so every handle issued in a run is unique.
#[derive(Debug)]
pub struct SimulatedHeap {
    cursor: u64,
    limit: u64,
    in_use: u64,
    allow_zero_size: bool,
    live: BTreeMap<Handle, u64>,
}

impl SimulatedHeap {
    pub const DEFAULT_BASE_ADDRESS: u64 = 0x1_0000;

    /// Creates a heap whose first grant lands at `base_address` (rounded up to a word).
    pub fn new(base_address: u64, limit: u64) -> Self {
        Self {
            cursor: align_up(base_address).unwrap_or(u64::MAX & !(WORD - 1)),
            limit,
            in_use: 0,
            allow_zero_size: true,
            live: BTreeMap::new(),
        }
    }

    pub fn with_zero_size(mut self, allow: bool) -> Self {
        self.allow_zero_size = allow;
        self
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn available(&self) -> u64 {
        self.limit - self.in_use
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for SimulatedHeap {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_ADDRESS, 1 << 30)
    }
}

impl BlockSource for SimulatedHeap {
    fn reserve(&mut self, size: u64) -> Result<Handle, HeapError> {
        if size == 0 && !self.allow_zero_size {
            return Err(HeapError::ZeroSize);
        }
        let available = self.available();
        if size > available {
            return Err(HeapError::LimitExceeded {
                requested: size,
                available,
            });
        }

        // Zero-size grants still consume a word so their handles stay distinct.
        let step = align_up(size.max(1)).ok_or(HeapError::AddressSpaceExhausted)?;
        let next = self
            .cursor
            .checked_add(step)
            .ok_or(HeapError::AddressSpaceExhausted)?;

        let handle = Handle::from_address(self.cursor);
        self.cursor = next;
        self.in_use += size;
        self.live.insert(handle, size);
        trace!(%handle, size, in_use = self.in_use, "heap grant");
        Ok(handle)
    }

    fn release(&mut self, handle: Handle) -> Result<u64, HeapError> {
        let size = self
            .live
            .remove(&handle)
            .ok_or(HeapError::UnknownHandle(handle))?;
        self.in_use -= size;
        trace!(%handle, size, in_use = self.in_use, "heap release");
        Ok(size)
    }

    fn in_use(&self) -> u64 {
        self.in_use
    }
}
