//! Unique table: the concurrent hash-consing store of decision nodes.
//!
//! The table is a fixed array of slots probed linearly from `hash % capacity`.
//! A slot moves through three states and never back:
//!
//! ```text
//! EMPTY --(compare-and-swap by the claiming thread)--> LOCKED --(publish)--> OCCUPIED
//! ```
//!
//! Only the thread that wins the compare-and-swap writes the content, so each
//! distinct node is stored exactly once. Threads that find a slot `LOCKED` spin
//! until the content is published and then compare it with their query, exactly
//! as they would for a slot that was already occupied.

use std::hint::spin_loop;
use std::mem::size_of;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, AtomicUsize, Ordering};

use log::{debug, warn};

use crate::error::{BddError, Result};
use crate::node::Node;
use crate::reference::Ref;
use crate::utils::MyHash;

const EMPTY: u8 = 0;
const LOCKED: u8 = 1;
const OCCUPIED: u8 = 2;

/// Bytes taken by one unique-table slot.
pub(crate) const SLOT_SIZE: usize = size_of::<Slot>();

#[derive(Default)]
struct Slot {
    state: AtomicU8,
    variable: AtomicU32,
    children: AtomicU64,
}

impl Slot {
    fn is_empty(&self) -> bool {
        self.state.load(Ordering::Acquire) == EMPTY
    }

    fn is_occupied(&self) -> bool {
        self.state.load(Ordering::Acquire) == OCCUPIED
    }

    /// Try to move the slot from `EMPTY` to `LOCKED`.
    fn try_claim(&self) -> bool {
        self.state
            .compare_exchange(EMPTY, LOCKED, Ordering::Acquire, Ordering::Acquire)
            .is_ok()
    }

    /// Write the content of a claimed slot and make it visible to readers.
    fn publish(&self, node: Node) {
        debug_assert_eq!(self.state.load(Ordering::Relaxed), LOCKED);
        self.variable.store(node.variable, Ordering::Relaxed);
        self.children.store(node.children(), Ordering::Relaxed);
        self.state.store(OCCUPIED, Ordering::Release);
    }

    /// Spin while another thread is between claiming and publishing.
    ///
    /// Unbounded: the claiming thread publishes right after its CAS, so the wait is short.
    fn wait_occupied(&self) {
        while !self.is_occupied() {
            spin_loop();
        }
    }

    /// Content of a slot observed as `OCCUPIED`.
    fn load(&self) -> Node {
        Node::from_parts(
            self.variable.load(Ordering::Relaxed),
            self.children.load(Ordering::Relaxed),
        )
    }
}

pub struct UniqueTable {
    slots: Box<[Slot]>,
    /// Number of occupied slots.
    count: AtomicUsize,
}

impl UniqueTable {
    /// Largest capacity whose ids still fit into a [`Ref`].
    pub const MAX_CAPACITY: usize = (u32::MAX - Ref::TERMINALS) as usize;

    /// Create a table using at most `budget` bytes of slot storage.
    pub fn new(budget: usize) -> Result<Self> {
        let mut capacity = budget / SLOT_SIZE;
        if capacity > Self::MAX_CAPACITY {
            warn!(
                "Unique table budget of {} bytes exceeds the id space, clamping to {} slots",
                budget,
                Self::MAX_CAPACITY
            );
            capacity = Self::MAX_CAPACITY;
        }
        if capacity == 0 {
            return Err(BddError::AllocationFailure {
                component: "unique table",
                bytes: budget,
            });
        }
        Self::with_capacity(capacity)
    }

    /// Create a table of exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let bytes = capacity.saturating_mul(SLOT_SIZE);
        if capacity == 0 || capacity > Self::MAX_CAPACITY {
            return Err(BddError::AllocationFailure {
                component: "unique table",
                bytes,
            });
        }

        let mut slots: Vec<Slot> = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| BddError::AllocationFailure {
                component: "unique table",
                bytes,
            })?;
        slots.resize_with(capacity, Slot::default);
        debug!("Allocated unique table of {} slots ({} bytes)", capacity, bytes);

        Ok(Self {
            slots: slots.into_boxed_slice(),
            count: AtomicUsize::new(0),
        })
    }

    /// Get the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get the number of occupied slots.
    ///
    /// Advisory under concurrent insertion: a node becomes visible slightly
    /// before it is counted.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve `node` to its canonical id, allocating a slot on first sight.
    pub fn lookup_create(&self, node: Node) -> Result<Ref> {
        let capacity = self.capacity();
        let start = (node.hash() % capacity as u64) as usize;

        for i in 0..capacity {
            let index = (start + i) % capacity;
            let slot = &self.slots[index];

            if slot.is_empty() && slot.try_claim() {
                slot.publish(node);
                self.count.fetch_add(1, Ordering::Relaxed);
                return Ok(Ref::from_slot(index));
            }

            // Either occupied already, or some thread is filling it right now.
            slot.wait_occupied();
            if slot.load() == node {
                return Ok(Ref::from_slot(index));
            }
        }

        Err(BddError::CapacityExhausted { capacity })
    }

    /// Content of the node with the given id, if it has been published.
    pub fn node(&self, id: Ref) -> Option<Node> {
        let slot = self.slots.get(id.slot()?)?;
        if slot.is_occupied() {
            Some(slot.load())
        } else {
            None
        }
    }

    /// Iterate over all published nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Ref, Node)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_occupied())
            .map(|(index, slot)| (Ref::from_slot(index), slot.load()))
    }
}
