//! # hermes-bdd: concurrent Binary Decision Diagrams in Rust
//!
//! **`hermes-bdd`** represents boolean functions as reduced ordered **Binary Decision Diagrams (BDDs)**
//! with maximal structural sharing, and lets any number of threads build them at once.
//!
//! ## What is a BDD?
//!
//! A Binary Decision Diagram is a data structure that represents a boolean function as a directed acyclic graph.
//! It is **canonical** --- for a fixed variable ordering, every boolean function has exactly one node,
//! so equivalence of two functions is a comparison of two integer ids.
//!
//! ## Key Features
//!
//! - **Concurrent hash consing**: The [`UniqueTable`][crate::table::UniqueTable] locks per slot, not globally,
//!   so threads creating unrelated nodes never wait for each other, and racing creators of the same node
//!   always agree on one id.
//! - **Operation memo**: A fixed-size [`ComputedTable`][crate::cache::ComputedTable] bounds the cost of
//!   recursive operations by the size of the shared graph.
//! - **Fixed memory**: Both tables are allocated once from the budgets in [`BddConfig`][crate::config::BddConfig].
//! - **0-Based Indexing**: Variables are plain `u32` indices ordered numerically; `u32::MAX` is reserved.
//!
//! ## Basic Usage
//!
//! ```rust
//! use std::collections::BTreeSet;
//!
//! use num_bigint::BigUint;
//!
//! use hermes_bdd::config::BddConfig;
//! use hermes_bdd::manager::Manager;
//!
//! # fn main() -> hermes_bdd::error::Result<()> {
//! // 1. Create a manager (or install the process-wide one with `hermes_bdd::init`)
//! let bdd = Manager::new(BddConfig::default().with_node_capacity(1 << 12).with_cache_bits(12))?;
//!
//! // 2. Create variables
//! let x0 = bdd.mk_var(0)?;
//! let x1 = bdd.mk_var(1)?;
//!
//! // 3. Build a formula: f = x0 AND (NOT x1)
//! let f = bdd.apply_and(x0, bdd.apply_not(x1)?)?;
//!
//! // 4. Count its models over {x0, x1}
//! let vars = BTreeSet::from([0, 1]);
//! assert_eq!(bdd.count_sat(f, &vars)?, BigUint::from(1u32));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Components
//!
//! - **[`table`]**: The unique table (hash-consing store).
//! - **[`cache`]**: The computed table (operation memo).
//! - **[`arena`]**: Node construction with the reduction and ordering checks.
//! - **[`manager`]**: The owner of both tables, and the process-wide instance.
//! - **[`bdd`]**, **[`sat`]**: Boolean operations and model counting.

pub mod arena;
pub mod bdd;
pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod node;
pub mod reference;
pub mod sat;
pub mod table;
pub mod utils;

pub use manager::{global, init};
