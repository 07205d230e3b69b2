//! Error types

use std::fmt;

use crate::reference::Ref;

/// Result of fallible BDD operations.
pub type Result<T> = std::result::Result<T, BddError>;

/// Errors reported by the node store, the memo table and the manager
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BddError {
    /// The unique table has no empty slot left on the probe sequence.
    CapacityExhausted { capacity: usize },
    /// The caller broke a construction invariant (a programming error).
    InvariantViolation(Violation),
    /// A table could not be reserved at construction time.
    AllocationFailure { component: &'static str, bytes: usize },
    /// [`init`][crate::manager::init] was called more than once.
    AlreadyInitialized,
    /// The process-wide manager was requested before [`init`][crate::manager::init].
    NotInitialized,
}

/// Details of an [`BddError::InvariantViolation`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Violation {
    /// A child tests a variable that is not strictly below its parent.
    Ordering { variable: u32, child_variable: u32 },
    /// The id is neither a terminal nor a node of this manager.
    UnknownNode(Ref),
    /// The terminal sentinel variable was used for a decision node.
    ReservedVariable,
    /// The function depends on a variable outside the counting domain.
    OutOfDomain { variable: u32 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Ordering {
                variable,
                child_variable,
            } => write!(
                f,
                "node on variable {variable} has a child on variable {child_variable}"
            ),
            Violation::UnknownNode(node) => write!(f, "unknown node {node}"),
            Violation::ReservedVariable => f.write_str("variable index is reserved for terminals"),
            Violation::OutOfDomain { variable } => {
                write!(f, "variable {variable} is not part of the domain")
            }
        }
    }
}

impl fmt::Display for BddError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BddError::CapacityExhausted { capacity } => {
                write!(f, "unique table is full ({capacity} nodes)")
            }
            BddError::InvariantViolation(violation) => {
                write!(f, "invariant violation: {violation}")
            }
            BddError::AllocationFailure { component, bytes } => {
                write!(f, "could not allocate {bytes} bytes for the {component}")
            }
            BddError::AlreadyInitialized => f.write_str("the BDD manager is already initialized"),
            BddError::NotInitialized => f.write_str("the BDD manager is not initialized"),
        }
    }
}

impl std::error::Error for BddError {}

impl From<Violation> for BddError {
    fn from(violation: Violation) -> Self {
        BddError::InvariantViolation(violation)
    }
}
