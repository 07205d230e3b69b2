//! The BDD manager and the process-wide instance.
//!
//! A [`Manager`] owns one [`Arena`] (and through it the unique table) and one
//! [`ComputedTable`]. Managers are ordinary values, so tests build their own;
//! programs that want a single shared manager call [`init`] once at startup and
//! reach it from anywhere through [`global`].

use std::fmt::Debug;
use std::sync::OnceLock;

use log::info;

use crate::arena::Arena;
use crate::cache::{ComputedTable, Op};
use crate::config::BddConfig;
use crate::error::{BddError, Result};
use crate::reference::Ref;
use crate::table::UniqueTable;

pub struct Manager {
    arena: Arena,
    cache: ComputedTable,
    config: BddConfig,
}

impl Manager {
    pub fn new(config: BddConfig) -> Result<Self> {
        let table = UniqueTable::new(config.node_budget)?;
        let cache = ComputedTable::new(config.cache_budget)?;
        info!(
            "Created BDD manager: {} node slots, {} cache entries",
            table.capacity(),
            cache.capacity()
        );

        Ok(Self {
            arena: Arena::new(table),
            cache,
            config,
        })
    }

    pub fn config(&self) -> &BddConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn cache(&self) -> &ComputedTable {
        &self.cache
    }

    /// Number of decision nodes created so far.
    pub fn num_nodes(&self) -> usize {
        self.arena.len()
    }

    /// Canonical node `if variable then high else low`.
    ///
    /// This is the sole node-construction primitive; see [`Arena::make`].
    pub fn mk_node(&self, variable: u32, low: Ref, high: Ref) -> Result<Ref> {
        self.arena.make(variable, low, high)
    }

    pub fn computed_get(&self, op: Op, operands: &[Ref]) -> Option<Ref> {
        self.cache.get(op, operands)
    }

    pub fn computed_put(&self, op: Op, operands: &[Ref], result: Ref) {
        self.cache.put(op, operands, result)
    }
}

impl Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("capacity", &self.arena.table().capacity())
            .field("nodes", &self.num_nodes())
            .field("cache_capacity", &self.cache.capacity())
            .field("cache_hits", &self.cache.hits())
            .field("cache_misses", &self.cache.misses())
            .field("cache_faults", &self.cache.faults())
            .finish()
    }
}

static GLOBAL: OnceLock<Manager> = OnceLock::new();

/// Install the process-wide manager. Must be called once, before [`global`].
pub fn init(config: BddConfig) -> Result<&'static Manager> {
    if GLOBAL.get().is_some() {
        return Err(BddError::AlreadyInitialized);
    }
    let manager = Manager::new(config)?;
    // Another thread may have won the race while the tables were allocated.
    GLOBAL
        .set(manager)
        .map_err(|_| BddError::AlreadyInitialized)?;
    info!("Installed process-wide BDD manager");
    global()
}

/// The process-wide manager installed by [`init`].
pub fn global() -> Result<&'static Manager> {
    GLOBAL.get().ok_or(BddError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::node::Node;

    fn manager() -> Manager {
        let config = BddConfig::default()
            .with_node_capacity(256)
            .with_cache_bits(8);
        Manager::new(config).unwrap()
    }

    #[test]
    fn test_new() {
        let mgr = manager();
        assert_eq!(mgr.arena().table().capacity(), 256);
        assert_eq!(mgr.cache().capacity(), 256);
        assert_eq!(mgr.num_nodes(), 0);
    }

    #[test]
    fn test_new_rejects_empty_budgets() {
        let config = BddConfig::default().with_node_budget(0);
        assert!(matches!(
            Manager::new(config),
            Err(BddError::AllocationFailure {
                component: "unique table",
                ..
            })
        ));

        let config = BddConfig::default()
            .with_node_capacity(16)
            .with_cache_budget(0);
        assert!(matches!(
            Manager::new(config),
            Err(BddError::AllocationFailure {
                component: "computed table",
                ..
            })
        ));
    }

    #[test]
    fn test_mk_node() {
        let mgr = manager();

        let x = mgr.mk_node(1, Ref::FALSE, Ref::TRUE).unwrap();
        assert_eq!(
            mgr.arena().node(x).unwrap(),
            Node::new(1, Ref::FALSE, Ref::TRUE)
        );
        assert_eq!(mgr.mk_node(0, x, x).unwrap(), x);
        assert_eq!(mgr.num_nodes(), 1);
    }

    #[test]
    fn test_computed_roundtrip() {
        let mgr = manager();

        let a = mgr.mk_node(1, Ref::FALSE, Ref::TRUE).unwrap();
        let b = mgr.mk_node(2, Ref::FALSE, Ref::TRUE).unwrap();
        let c = mgr.mk_node(1, Ref::FALSE, b).unwrap();
        mgr.computed_put(Op::And, &[a, b], c);
        assert_eq!(mgr.computed_get(Op::And, &[a, b]), Some(c));
        assert_eq!(mgr.computed_get(Op::Or, &[a, b]), None);
    }

    #[test]
    fn test_debug() {
        let mgr = manager();
        let s = format!("{:?}", mgr);
        assert!(s.starts_with("Manager"));
        assert!(s.contains("capacity: 256"));
    }
}
