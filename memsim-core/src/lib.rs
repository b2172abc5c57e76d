//! # memsim-core
//!
//! Bookkeeping layer for the memory simulator: an ordered, capacity-bounded
//! table of simulated blocks backed by a pluggable block source.
//!
//! ### Key Submodules:
//! - `alloc::block`: `Block` and `Handle` records
//! - `alloc::heap`: `BlockSource` trait and the `SimulatedHeap` bump source
//! - `alloc::registry`: the Block Registry (allocate/free/list/leak report)
//! - `alloc::stats`: usage counters kept alongside the registry

pub mod alloc;
pub mod error;

pub use alloc::{Block, BlockSource, Handle, LeakReport, Registry, RegistryStats, SimulatedHeap};
pub use error::{HeapError, RegistryError};
