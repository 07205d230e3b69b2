//! End-to-end tests for the manager.
//!
//! Tests cover N-queens, canonicality through the boolean operations and
//! concurrent construction from many threads.

use std::collections::BTreeSet;
use std::thread;

use num_bigint::BigUint;

use hermes_bdd::config::BddConfig;
use hermes_bdd::error::Result;
use hermes_bdd::manager::Manager;
use hermes_bdd::node::Node;
use hermes_bdd::reference::Ref;

fn manager(node_bits: u32) -> Manager {
    let config = BddConfig::default()
        .with_node_capacity(1 << node_bits)
        .with_cache_bits(node_bits.min(16));
    Manager::new(config).unwrap()
}

/// N-queens over variables `row * n + col`, encoded as implications per cell.
fn queens(bdd: &Manager, n: usize) -> Result<Ref> {
    let var = |row: usize, col: usize| bdd.mk_var((row * n + col) as u32);
    let mut queen = bdd.one();

    for row in 0..n {
        let cells = (0..n).map(|col| var(row, col)).collect::<Result<Vec<_>>>()?;
        queen = bdd.apply_and(queen, bdd.apply_or_many(cells)?)?;
    }

    for row in 0..n {
        for col in 0..n {
            let here = var(row, col)?;
            for r in 0..n {
                for c in 0..n {
                    if (r, c) == (row, col) {
                        continue;
                    }
                    let attacks = r == row
                        || c == col
                        || r as isize - c as isize == row as isize - col as isize
                        || r + c == row + col;
                    if attacks {
                        let other = bdd.apply_not(var(r, c)?)?;
                        queen = bdd.apply_and(queen, bdd.apply_imply(here, other)?)?;
                    }
                }
            }
        }
    }

    Ok(queen)
}

// ─── N-Queens ──────────────────────────────────────────────────────────────────

#[test_log::test]
fn one_queen() {
    let bdd = manager(10);

    let queen = queens(&bdd, 1).unwrap();

    assert_eq!(queen, bdd.mk_var(0).unwrap());
    assert_eq!(
        bdd.arena().node(queen).unwrap(),
        Node::new(0, Ref::FALSE, Ref::TRUE)
    );
    assert_eq!(bdd.num_nodes(), 1);

    let vars = BTreeSet::from([0]);
    assert_eq!(bdd.count_sat(queen, &vars).unwrap(), BigUint::from(1u32));
}

#[test_log::test]
fn small_boards() {
    let expected = [(2, 0u32), (3, 0), (4, 2), (5, 10), (6, 4)];
    for (n, solutions) in expected {
        let bdd = manager(18);
        let queen = queens(&bdd, n).unwrap();
        let vars: BTreeSet<u32> = (0..(n * n) as u32).collect();
        assert_eq!(
            bdd.count_sat(queen, &vars).unwrap(),
            BigUint::from(solutions),
            "{n}-queens"
        );
    }
}

#[test_log::test]
fn rebuilding_yields_same_root() {
    let bdd = manager(14);

    let first = queens(&bdd, 4).unwrap();
    let nodes = bdd.num_nodes();
    let second = queens(&bdd, 4).unwrap();

    assert_eq!(first, second);
    assert_eq!(bdd.num_nodes(), nodes);
}

// ─── Canonicality ──────────────────────────────────────────────────────────────

#[test_log::test]
fn operand_order_is_irrelevant() {
    let bdd = manager(10);

    let a = bdd.mk_var(0).unwrap();
    let b = bdd.mk_var(1).unwrap();
    assert_eq!(bdd.apply_and(a, b).unwrap(), bdd.apply_and(b, a).unwrap());

    // Same function through different formulas
    let c = bdd.mk_var(2).unwrap();
    let left = bdd
        .apply_and(bdd.apply_and(a, b).unwrap(), c)
        .unwrap();
    let right = bdd
        .apply_and(a, bdd.apply_and(c, b).unwrap())
        .unwrap();
    assert_eq!(left, right);
}

#[test_log::test]
fn ite_agrees_with_binary_operators() {
    let bdd = manager(12);

    let vars: Vec<Ref> = (0..5).map(|v| bdd.mk_var(v).unwrap()).collect();
    let f = bdd.apply_xor(vars[0], vars[3]).unwrap();
    let g = bdd.apply_or(vars[1], vars[4]).unwrap();
    let h = bdd.apply_and(vars[2], vars[3]).unwrap();

    let ite = bdd.apply_ite(f, g, h).unwrap();
    let expected = bdd
        .apply_or(
            bdd.apply_and(f, g).unwrap(),
            bdd.apply_and(bdd.apply_not(f).unwrap(), h).unwrap(),
        )
        .unwrap();
    assert_eq!(ite, expected);
}

// ─── Concurrency ───────────────────────────────────────────────────────────────

#[test_log::test]
fn concurrent_threads_agree_on_ids() {
    let bdd = manager(18);

    let roots: Vec<Ref> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| queens(&bdd, 5).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(roots.iter().all(|&r| r == roots[0]));

    // Every node content is stored exactly once.
    let contents: Vec<Node> = bdd.arena().table().iter().map(|(_, n)| n).collect();
    let distinct: std::collections::HashSet<Node> = contents.iter().copied().collect();
    assert_eq!(contents.len(), distinct.len());
    assert_eq!(contents.len(), bdd.num_nodes());

    let vars: BTreeSet<u32> = (0..25).collect();
    assert_eq!(bdd.count_sat(roots[0], &vars).unwrap(), BigUint::from(10u32));
}

#[test_log::test]
fn concurrent_unrelated_functions() {
    let bdd = manager(16);

    let parities: Vec<Ref> = thread::scope(|s| {
        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let bdd = &bdd;
                s.spawn(move || {
                    let mut f = bdd.zero();
                    for v in (t * 8)..(t * 8 + 8) {
                        f = bdd.apply_xor(f, bdd.mk_var(v).unwrap()).unwrap();
                    }
                    f
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (t, &f) in parities.iter().enumerate() {
        let t = t as u32;
        let vars: BTreeSet<u32> = ((t * 8)..(t * 8 + 8)).collect();
        assert_eq!(bdd.count_sat(f, &vars).unwrap(), BigUint::from(128u32));
    }
}
