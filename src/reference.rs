use std::fmt::{Display, Formatter};

/// Canonical id of a BDD node.
///
/// A `Ref` is a weak reference: it carries no ownership and is meaningful
/// only relative to the [`Manager`][crate::manager::Manager] that minted it.
/// The ids `0` and `1` are reserved for the terminals, every other id `i`
/// denotes the unique-table slot `i - 2`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Ref(u32);

impl Ref {
    /// The constant-false terminal.
    pub const FALSE: Self = Self(0);
    /// The constant-true terminal.
    pub const TRUE: Self = Self(1);

    /// Number of reserved terminal ids.
    pub(crate) const TERMINALS: u32 = 2;

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Id of the node stored in the unique-table slot `index`.
    pub(crate) const fn from_slot(index: usize) -> Self {
        Self(index as u32 + Self::TERMINALS)
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_terminal(self) -> bool {
        self.0 < Self::TERMINALS
    }

    /// Unique-table slot of a non-terminal id.
    pub const fn slot(self) -> Option<usize> {
        if self.is_terminal() {
            None
        } else {
            Some((self.0 - Self::TERMINALS) as usize)
        }
    }

    /// Terminal constant, if this is one.
    pub const fn as_bool(self) -> Option<bool> {
        match self.0 {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

impl From<bool> for Ref {
    fn from(value: bool) -> Self {
        if value {
            Ref::TRUE
        } else {
            Ref::FALSE
        }
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.as_bool() {
            Some(false) => write!(f, "@0"),
            Some(true) => write!(f, "@1"),
            None => write!(f, "@{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminals() {
        assert!(Ref::FALSE.is_terminal());
        assert!(Ref::TRUE.is_terminal());
        assert_eq!(Ref::FALSE.slot(), None);
        assert_eq!(Ref::TRUE.as_bool(), Some(true));
        assert_eq!(Ref::from(false), Ref::FALSE);
    }

    #[test]
    fn test_slot_mapping() {
        let r = Ref::from_slot(0);
        assert!(!r.is_terminal());
        assert_eq!(r.get(), 2);
        assert_eq!(r.slot(), Some(0));
        assert_eq!(Ref::from_slot(41).slot(), Some(41));
        assert_eq!(r.as_bool(), None);
    }
}
