//! ## memsim-core::alloc
//! **Simulated block bookkeeping**
//!
//! ### Key Submodules:
//! - `block`: block records and opaque handles
//! - `heap`: the allocator seam and its simulated implementation
//! - `registry`: ordered, capacity-bounded block table
//! - `stats`: usage tracking and statistics

pub mod block;
pub mod heap;
pub mod registry;
pub mod stats;

pub use block::{Block, Handle};
pub use heap::{BlockSource, SimulatedHeap};
pub use registry::{LeakReport, Registry};
pub use stats::RegistryStats;
