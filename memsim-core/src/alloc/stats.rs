//! ## memsim-core::alloc::stats
//! **Registry usage statistics**
//!
//! Counters updated by the registry on every operation. The registry is owned
//! by a single session, so plain integers suffice.

/// Usage counters for one registry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    allocations: u64,
    frees: u64,
    failed_allocations: u64,
    capacity_rejections: u64,
    peak_bytes: u64,
    peak_blocks: usize,
}

impl RegistryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful allocation and the usage level it produced.
    #[inline]
    pub fn record_allocation(&mut self, total_bytes: u64, blocks: usize) {
        self.allocations += 1;
        self.peak_bytes = self.peak_bytes.max(total_bytes);
        self.peak_blocks = self.peak_blocks.max(blocks);
    }

    #[inline]
    pub fn record_free(&mut self) {
        self.frees += 1;
    }

    #[inline]
    pub fn record_failed_allocation(&mut self) {
        self.failed_allocations += 1;
    }

    #[inline]
    pub fn record_capacity_rejection(&mut self) {
        self.capacity_rejections += 1;
    }

    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    pub fn frees(&self) -> u64 {
        self.frees
    }

    pub fn failed_allocations(&self) -> u64 {
        self.failed_allocations
    }

    pub fn capacity_rejections(&self) -> u64 {
        self.capacity_rejections
    }

    /// Highest `total_allocated` observed.
    pub fn peak_bytes(&self) -> u64 {
        self.peak_bytes
    }

    /// Highest active block count observed.
    pub fn peak_blocks(&self) -> usize {
        self.peak_blocks
    }
}
