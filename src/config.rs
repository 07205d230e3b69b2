//! Manager configuration.

use crate::cache::{budget_bits, ComputedTable, ENTRY_SIZE};
use crate::table::SLOT_SIZE;

/// Size of one mebibyte.
pub const MIB: usize = 1 << 20;

/// Memory budgets of a [`Manager`][crate::manager::Manager].
///
/// Both tables are allocated once, at construction, and never grow.
///
/// ```
/// use hermes_bdd::config::BddConfig;
///
/// let config = BddConfig::default()
///     .with_node_capacity(1 << 16)
///     .with_cache_bits(14);
/// assert_eq!(config.node_capacity(), 1 << 16);
/// assert_eq!(config.cache_capacity(), 1 << 14);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BddConfig {
    /// Bytes reserved for the unique table.
    pub node_budget: usize,
    /// Bytes reserved for the computed table.
    pub cache_budget: usize,
}

impl BddConfig {
    pub const DEFAULT_NODE_BUDGET: usize = 256 * MIB;
    pub const DEFAULT_CACHE_BUDGET: usize = 0x2000_0000;

    pub fn with_node_budget(mut self, bytes: usize) -> Self {
        self.node_budget = bytes;
        self
    }

    pub fn with_cache_budget(mut self, bytes: usize) -> Self {
        self.cache_budget = bytes;
        self
    }

    /// Budget for exactly `nodes` unique-table slots.
    pub fn with_node_capacity(self, nodes: usize) -> Self {
        self.with_node_budget(nodes.saturating_mul(SLOT_SIZE))
    }

    /// Budget for `2^bits` computed-table entries.
    pub fn with_cache_bits(self, bits: u32) -> Self {
        assert!(
            bits <= ComputedTable::MAX_BITS,
            "Cache bits must be in range 0..={}, got {}",
            ComputedTable::MAX_BITS,
            bits
        );
        self.with_cache_budget((1usize << bits).saturating_mul(ENTRY_SIZE))
    }

    /// Number of unique-table slots this budget pays for.
    pub fn node_capacity(&self) -> usize {
        self.node_budget / SLOT_SIZE
    }

    /// Number of computed-table entries this budget pays for (a power of two, or zero).
    pub fn cache_capacity(&self) -> usize {
        budget_bits(self.cache_budget).map_or(0, |bits| 1 << bits)
    }
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            node_budget: Self::DEFAULT_NODE_BUDGET,
            cache_budget: Self::DEFAULT_CACHE_BUDGET,
        }
    }
}
