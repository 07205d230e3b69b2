use crate::reference::Ref;
use crate::utils::MyHash;

/// Variable reported by terminals. Compares greater than any real variable.
pub const TERMINAL_VARIABLE: u32 = u32::MAX;

/// Content of a decision node: the hash-consing key of the unique table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub const fn new(variable: u32, low: Ref, high: Ref) -> Self {
        Self { variable, low, high }
    }

    /// Pack both children into one word (`low` in the high half).
    pub(crate) const fn children(&self) -> u64 {
        ((self.low.get() as u64) << 32) | self.high.get() as u64
    }

    pub(crate) const fn from_parts(variable: u32, children: u64) -> Self {
        Self {
            variable,
            low: Ref::new((children >> 32) as u32),
            high: Ref::new(children as u32),
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        (
            self.variable as u64,
            self.low.get() as u64,
            self.high.get() as u64,
        )
            .hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_children() {
        let node = Node::new(7, Ref::new(12), Ref::TRUE);
        let packed = node.children();
        assert_eq!(Node::from_parts(7, packed), node);
    }

    #[test]
    fn test_hash_distinguishes_children() {
        let a = Node::new(0, Ref::FALSE, Ref::TRUE);
        let b = Node::new(0, Ref::TRUE, Ref::FALSE);
        assert_ne!(MyHash::hash(&a), MyHash::hash(&b));
    }
}
