//! Lifecycle of the process-wide manager.
//!
//! Kept in its own test binary (and a single test) so no other test can
//! install the manager first.

use hermes_bdd::config::BddConfig;
use hermes_bdd::error::BddError;
use hermes_bdd::reference::Ref;

#[test]
fn init_once_then_global() {
    assert_eq!(hermes_bdd::global().unwrap_err(), BddError::NotInitialized);

    let config = BddConfig::default()
        .with_node_capacity(1 << 10)
        .with_cache_bits(10);
    let bdd = hermes_bdd::init(config).unwrap();
    assert_eq!(bdd.config().node_capacity(), 1 << 10);

    assert_eq!(
        hermes_bdd::init(config).unwrap_err(),
        BddError::AlreadyInitialized
    );

    let x = bdd.mk_var(0).unwrap();
    let again = hermes_bdd::global().unwrap();
    assert!(std::ptr::eq(bdd, again));
    assert_eq!(again.mk_var(0).unwrap(), x);
    assert_eq!(again.apply_and(x, Ref::TRUE).unwrap(), x);
}
