//! ## memsim-core::alloc::registry
//! **Block Registry**
//!
//! Ordered, capacity-bounded table of live blocks plus the running byte total.
//! Freeing position `i` shifts every later block down by one, so indices stay
//! dense and survivors keep their relative order.

use tracing::{debug, error, warn};

use crate::alloc::block::{Block, Handle};
use crate::alloc::heap::{BlockSource, SimulatedHeap};
use crate::alloc::stats::RegistryStats;
use crate::error::{HeapError, RegistryError};

/// Blocks still live when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakReport {
    pub blocks: Vec<Block>,
    pub total_bytes: u64,
}

impl LeakReport {
    pub fn is_clean(&self) -> bool {
        self.blocks.is_empty()
    }
}

pub struct Registry<S = SimulatedHeap> {
    blocks: Vec<Block>,
    capacity: usize,
    total_allocated: u64,
    source: S,
    stats: RegistryStats,
}

impl<S: BlockSource> Registry<S> {
    /// Creates an empty registry holding at most `capacity` blocks.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn new(capacity: usize, source: S) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            blocks: Vec::with_capacity(capacity),
            capacity,
            total_allocated: 0,
            source,
            stats: RegistryStats::new(),
        }
    }

    /// Fails with `CapacityExceeded` when no further block fits, counting the rejection.
    pub fn check_capacity(&mut self) -> Result<(), RegistryError> {
        if !self.is_full() {
            return Ok(());
        }
        self.stats.record_capacity_rejection();
        warn!(capacity = self.capacity, "registry full");
        Err(RegistryError::CapacityExceeded {
            capacity: self.capacity,
        })
    }

    /// Allocates a block of `size` bytes and appends it to the table.
    pub fn allocate(&mut self, size: u64) -> Result<Handle, RegistryError> {
        self.check_capacity()?;

        let handle = self.source.reserve(size).map_err(|err| {
            self.stats.record_failed_allocation();
            warn!(size, error = %err, "allocation refused");
            RegistryError::AllocationFailed(err)
        })?;

        let Some(total) = self.total_allocated.checked_add(size) else {
            // Give the grant back so the source and the table stay in step.
            self.source.release(handle).map_err(|err| {
                error!(
                    handle = %handle,
                    error = %err,
                    "block source rejected rollback"
                );
                RegistryError::Corrupted(err)
            })?;
            self.stats.record_failed_allocation();
            return Err(RegistryError::AllocationFailed(
                HeapError::LimitExceeded {
                    requested: size,
                    available: u64::MAX - self.total_allocated,
                },
            ));
        };

        self.blocks.push(Block::new(handle, size));
        self.total_allocated = total;
        self.stats
            .record_allocation(self.total_allocated, self.blocks.len());
        debug!(%handle, size, total = self.total_allocated, "block allocated");
        Ok(handle)
    }

    /// Frees the block at `index`, returning it.
    pub fn free(&mut self, index: usize) -> Result<Block, RegistryError> {
        let Some(&block) = self.blocks.get(index) else {
            return Err(RegistryError::InvalidIndex {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                count: self.blocks.len(),
            });
        };

        let released = self.source.release(block.handle).map_err(|err| {
            error!(
                index,
                handle = %block.handle,
                error = %err,
                "block source rejected release"
            );
            RegistryError::Corrupted(err)
        })?;
        debug_assert_eq!(released, block.size);

        self.blocks.remove(index);
        self.total_allocated -= block.size;
        self.stats.record_free();
        debug!(
            index,
            handle = %block.handle,
            size = block.size,
            total = self.total_allocated,
            "block freed"
        );
        Ok(block)
    }

    /// Snapshot of `(index, block)` pairs in table order.
    pub fn list(&self) -> impl Iterator<Item = (usize, &Block)> + '_ {
        self.blocks.iter().enumerate()
    }

    pub fn leak_report(&self) -> LeakReport {
        LeakReport {
            blocks: self.blocks.clone(),
            total_bytes: self.total_allocated,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.blocks.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_allocated(&self) -> u64 {
        self.total_allocated
    }

    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl Default for Registry<SimulatedHeap> {
    fn default() -> Self {
        Self::new(100, SimulatedHeap::default())
    }
}
