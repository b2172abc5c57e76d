//! Registry and simulated heap parameters.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::size::{deserialize_address, deserialize_size};
use crate::validation;

/// Block table limits.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of simultaneously live blocks.
    #[validate(range(min = 1, max = 1_000_000))]
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    100
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Simulated heap backing the registry.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct HeapConfig {
    /// Byte budget; requests beyond what remains are refused.
    #[validate(range(min = 1))]
    #[serde(default = "default_limit", deserialize_with = "deserialize_size")]
    pub limit: u64,

    /// Address of the first grant.
    #[validate(custom(function = validation::validate_base_address))]
    #[serde(default = "default_base_address", deserialize_with = "deserialize_address")]
    pub base_address: u64,

    /// Grant zero-byte requests?
    #[serde(default = "default_allow_zero_size")]
    pub allow_zero_size: bool,
}

fn default_limit() -> u64 {
    1 << 30
}

fn default_base_address() -> u64 {
    0x1_0000
}

fn default_allow_zero_size() -> bool {
    true
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            base_address: default_base_address(),
            allow_zero_size: default_allow_zero_size(),
        }
    }
}
