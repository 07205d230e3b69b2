//! Node arena: the only way to construct decision nodes.
//!
//! [`Arena::make`] enforces the two invariants of reduced ordered BDDs before
//! handing the content to the [`UniqueTable`], so every id it returns denotes a
//! valid node.

use log::debug;

use crate::error::{Result, Violation};
use crate::node::{Node, TERMINAL_VARIABLE};
use crate::reference::Ref;
use crate::table::UniqueTable;

pub struct Arena {
    table: UniqueTable,
}

impl Arena {
    pub fn new(table: UniqueTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &UniqueTable {
        &self.table
    }

    /// Number of decision nodes, terminals excluded.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check whether `node` is a terminal or a published node of this arena.
    pub fn contains(&self, node: Ref) -> bool {
        node.is_terminal() || self.table.node(node).is_some()
    }

    /// Content of a decision node.
    pub fn node(&self, node: Ref) -> Result<Node> {
        self.table
            .node(node)
            .ok_or_else(|| Violation::UnknownNode(node).into())
    }

    /// Variable tested by `node`, [`TERMINAL_VARIABLE`] for terminals.
    pub fn variable(&self, node: Ref) -> Result<u32> {
        if node.is_terminal() {
            Ok(TERMINAL_VARIABLE)
        } else {
            Ok(self.node(node)?.variable)
        }
    }

    pub fn low(&self, node: Ref) -> Result<Ref> {
        Ok(self.node(node)?.low)
    }

    pub fn high(&self, node: Ref) -> Result<Ref> {
        Ok(self.node(node)?.high)
    }

    /// Canonical id of the function `if variable then high else low`.
    pub fn make(&self, variable: u32, low: Ref, high: Ref) -> Result<Ref> {
        debug!("make(v = {}, low = {}, high = {})", variable, low, high);

        if variable == TERMINAL_VARIABLE {
            return Err(Violation::ReservedVariable.into());
        }

        for child in [low, high] {
            if !self.contains(child) {
                return Err(Violation::UnknownNode(child).into());
            }
        }
        let low_variable = self.variable(low)?;
        let high_variable = self.variable(high)?;

        // Redundant test
        if low == high {
            debug!("make: duplicates {} == {}", low, high);
            return Ok(low);
        }

        for child_variable in [low_variable, high_variable] {
            if variable >= child_variable {
                return Err(Violation::Ordering {
                    variable,
                    child_variable,
                }
                .into());
            }
        }

        self.table.lookup_create(Node::new(variable, low, high))
    }
}
