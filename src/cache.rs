//! Computed table: the operation memo of the recursive BDD algorithms.
//!
//! A direct-mapped array where each key hashes to exactly one entry and
//! collisions overwrite. Every entry has its own lock which is only ever
//! `try_lock`ed: a contended lookup reports a miss and a contended insertion
//! is dropped. The full key is stored and compared, so a hit always belongs to
//! the requested operator and operands.

use std::mem::size_of;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::error::{BddError, Result};
use crate::reference::Ref;
use crate::utils::{mix64, pairing2, pairing3};

/// Operator tag of a memoized operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Op {
    Not,
    And,
    Or,
    Xor,
    Imply,
    Equiv,
    Ite,
}

impl Op {
    /// Number of operands the operator takes.
    pub const fn arity(self) -> usize {
        match self {
            Op::Not => 1,
            Op::Ite => 3,
            _ => 2,
        }
    }

    pub const fn is_commutative(self) -> bool {
        matches!(self, Op::And | Op::Or | Op::Xor | Op::Equiv)
    }
}

const MAX_ARITY: usize = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Entry {
    op: Op,
    operands: [Ref; MAX_ARITY],
    result: Ref,
}

/// Bytes taken by one computed-table entry.
pub(crate) const ENTRY_SIZE: usize = size_of::<Mutex<Option<Entry>>>();

pub struct ComputedTable {
    entries: Box<[Mutex<Option<Entry>>]>,
    bitmask: u64,
    hits: AtomicUsize,
    misses: AtomicUsize,
    faults: AtomicUsize,
}

/// Entry-count exponent paid for by `budget` bytes, capped at [`ComputedTable::MAX_BITS`].
pub(crate) fn budget_bits(budget: usize) -> Option<u32> {
    match budget / ENTRY_SIZE {
        0 => None,
        entries => Some(entries.ilog2().min(ComputedTable::MAX_BITS)),
    }
}

impl ComputedTable {
    /// Largest supported table: `2^MAX_BITS` entries.
    pub const MAX_BITS: u32 = 31;

    /// Create a table using at most `budget` bytes, rounded down to a power-of-two entry count.
    ///
    /// Budgets beyond `2^MAX_BITS` entries are capped.
    pub fn new(budget: usize) -> Result<Self> {
        let bits = budget_bits(budget).ok_or(BddError::AllocationFailure {
            component: "computed table",
            bytes: budget,
        })?;
        if (budget / ENTRY_SIZE).ilog2() > bits {
            warn!(
                "Computed table budget of {} bytes capped to 2^{} entries",
                budget,
                bits
            );
        }
        Self::with_bits(bits)
    }

    /// Create a table of `2^bits` entries.
    pub fn with_bits(bits: u32) -> Result<Self> {
        if bits > Self::MAX_BITS {
            return Err(BddError::AllocationFailure {
                component: "computed table",
                bytes: usize::MAX,
            });
        }

        let size = 1usize << bits;
        let bytes = size.saturating_mul(ENTRY_SIZE);
        let mut entries: Vec<Mutex<Option<Entry>>> = Vec::new();
        entries
            .try_reserve_exact(size)
            .map_err(|_| BddError::AllocationFailure {
                component: "computed table",
                bytes,
            })?;
        entries.resize_with(size, || Mutex::new(None));
        debug!("Allocated computed table of {} entries ({} bytes)", size, bytes);

        Ok(Self {
            entries: entries.into_boxed_slice(),
            bitmask: (size - 1) as u64,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            faults: AtomicUsize::new(0),
        })
    }

    /// Returns the number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries. This is O(n).
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.lock().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Returns the number of misses on an entry holding another key.
    pub fn faults(&self) -> usize {
        self.faults.load(Ordering::Relaxed)
    }

    /// Clears all entries. This is O(n).
    pub fn clear(&self) {
        for entry in self.entries.iter() {
            *entry.lock() = None;
        }
    }

    fn key(operands: &[Ref]) -> Option<[Ref; MAX_ARITY]> {
        if operands.is_empty() || operands.len() > MAX_ARITY {
            return None;
        }
        let mut key = [Ref::FALSE; MAX_ARITY];
        key[..operands.len()].copy_from_slice(operands);
        Some(key)
    }

    fn index(&self, op: Op, key: &[Ref; MAX_ARITY]) -> usize {
        let hash = pairing3(
            pairing2(op as u64, key[0].get() as u64),
            key[1].get() as u64,
            key[2].get() as u64,
        );
        (mix64(hash) & self.bitmask) as usize
    }

    /// Looks up the memoized result of `op` applied to `operands`.
    pub fn get(&self, op: Op, operands: &[Ref]) -> Option<Ref> {
        debug_assert_eq!(operands.len(), op.arity());
        let key = Self::key(operands)?;
        let entry = self.entries[self.index(op, &key)].try_lock();

        match entry.as_deref() {
            Some(Some(e)) if e.op == op && e.operands == key => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(e.result)
            }
            Some(Some(_)) => {
                self.faults.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Memoizes `result`, overwriting whatever shares its entry.
    pub fn put(&self, op: Op, operands: &[Ref], result: Ref) {
        debug_assert_eq!(operands.len(), op.arity());
        let Some(key) = Self::key(operands) else {
            return;
        };
        if let Some(mut entry) = self.entries[self.index(op, &key)].try_lock() {
            *entry = Some(Entry {
                op,
                operands: key,
                result,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use test_log::test;

    use super::*;

    fn r(raw: u32) -> Ref {
        Ref::new(raw)
    }

    #[test]
    fn test_put_get() {
        let cache = ComputedTable::with_bits(4).unwrap();

        cache.put(Op::And, &[r(2), r(3)], r(4));
        cache.put(Op::Or, &[r(2), r(3)], r(5));

        assert_eq!(cache.get(Op::And, &[r(2), r(3)]), Some(r(4)));
        assert_eq!(cache.get(Op::Or, &[r(2), r(3)]), Some(r(5)));
        assert_eq!(cache.get(Op::And, &[r(3), r(2)]), None);
        assert_eq!(cache.get(Op::Xor, &[r(2), r(3)]), None);
    }

    #[test]
    fn test_overwrite() {
        let cache = ComputedTable::with_bits(4).unwrap();

        cache.put(Op::And, &[r(2), r(3)], r(10));
        assert_eq!(cache.get(Op::And, &[r(2), r(3)]), Some(r(10)));

        cache.put(Op::And, &[r(2), r(3)], r(20));
        assert_eq!(cache.get(Op::And, &[r(2), r(3)]), Some(r(20)));
    }

    #[test]
    fn test_unary_and_ternary_keys() {
        let cache = ComputedTable::with_bits(6).unwrap();

        cache.put(Op::Not, &[r(7)], r(8));
        cache.put(Op::Ite, &[r(7), r(1), r(0)], r(7));

        assert_eq!(cache.get(Op::Not, &[r(7)]), Some(r(8)));
        assert_eq!(cache.get(Op::Ite, &[r(7), r(1), r(0)]), Some(r(7)));
        assert_eq!(cache.get(Op::Ite, &[r(7), r(0), r(1)]), None);
    }

    #[test]
    fn test_collision_never_returns_foreign_result() {
        // A single entry: every key collides.
        let cache = ComputedTable::with_bits(0).unwrap();

        for i in 2..50 {
            cache.put(Op::And, &[r(i), r(i + 1)], r(i + 100));
            for j in 2..=i {
                let got = cache.get(Op::And, &[r(j), r(j + 1)]);
                assert!(got.is_none() || got == Some(r(j + 100)));
            }
            assert_eq!(cache.get(Op::And, &[r(i), r(i + 1)]), Some(r(i + 100)));
        }
        assert!(cache.faults() > 0);
    }

    #[test]
    fn test_clear() {
        let cache = ComputedTable::with_bits(4).unwrap();

        cache.put(Op::And, &[r(2), r(3)], r(4));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(Op::And, &[r(2), r(3)]), None);
    }

    #[test]
    fn test_statistics() {
        let cache = ComputedTable::with_bits(4).unwrap();

        cache.get(Op::And, &[r(2), r(3)]); // Miss
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 0);

        cache.put(Op::And, &[r(2), r(3)], r(4));
        cache.get(Op::And, &[r(2), r(3)]); // Hit
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_budget_to_capacity() {
        let cache = ComputedTable::new(5 * ENTRY_SIZE).unwrap();
        assert_eq!(cache.capacity(), 4);
        assert!(matches!(
            ComputedTable::new(0),
            Err(BddError::AllocationFailure { .. })
        ));
    }

    #[test]
    fn test_oversized_budget_is_capped() {
        assert_eq!(budget_bits(1 << 40), Some(ComputedTable::MAX_BITS));
        assert_eq!(budget_bits(usize::MAX), Some(ComputedTable::MAX_BITS));
        assert_eq!(budget_bits(5 * ENTRY_SIZE), Some(2));
        assert_eq!(budget_bits(ENTRY_SIZE - 1), None);

        assert!(matches!(
            ComputedTable::with_bits(35),
            Err(BddError::AllocationFailure { .. })
        ));
    }

    #[test]
    fn test_concurrent_put_get() {
        let cache = ComputedTable::with_bits(3).unwrap();

        thread::scope(|s| {
            for t in 0..4u32 {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..1000u32 {
                        let a = r(2 + i % 17);
                        let b = r(2 + t);
                        cache.put(Op::Xor, &[a, b], r(a.get() * 1000 + b.get()));
                        if let Some(res) = cache.get(Op::Xor, &[a, b]) {
                            assert_eq!(res, r(a.get() * 1000 + b.get()));
                        }
                    }
                });
            }
        });
    }
}
