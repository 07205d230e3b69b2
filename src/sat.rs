use std::collections::{BTreeSet, HashMap};

use num_bigint::BigUint;

use crate::error::{Result, Violation};
use crate::manager::Manager;
use crate::node::TERMINAL_VARIABLE;
use crate::reference::Ref;

impl Manager {
    /// Returns one satisfying assignment of the variables along a path of `node`.
    ///
    /// Returns `None` if the BDD represents the constant false function.
    pub fn one_sat(&self, node: Ref) -> Result<Option<Vec<(u32, bool)>>> {
        if self.is_zero(node) {
            return Ok(None);
        }

        let mut path = Vec::new();
        let mut current = node;

        // In a reduced diagram every non-false node reaches the true terminal.
        while !self.is_one(current) {
            let n = self.arena().node(current)?;
            if !self.is_zero(n.high) {
                path.push((n.variable, true));
                current = n.high;
            } else {
                path.push((n.variable, false));
                current = n.low;
            }
        }

        Ok(Some(path))
    }

    /// Number of assignments to exactly the variables in `vars` that satisfy `node`.
    ///
    /// Fails with [`Violation::OutOfDomain`] if `node` depends on a variable not in `vars`.
    pub fn count_sat(&self, node: Ref, vars: &BTreeSet<u32>) -> Result<BigUint> {
        let domain: Vec<u32> = vars.iter().copied().collect();
        let mut cache = HashMap::new();
        let count = self._count_sat(node, &domain, &mut cache)?;
        let top = level(&domain, self.arena().variable(node)?)?;
        Ok(count << top)
    }

    /// Assignments to `domain[level(node)..]` satisfying `node`.
    fn _count_sat(
        &self,
        node: Ref,
        domain: &[u32],
        cache: &mut HashMap<Ref, BigUint>,
    ) -> Result<BigUint> {
        match node.as_bool() {
            Some(false) => return Ok(BigUint::ZERO),
            Some(true) => return Ok(BigUint::from(1u32)),
            None => {}
        }

        if let Some(count) = cache.get(&node) {
            return Ok(count.clone());
        }

        let n = self.arena().node(node)?;
        let here = level(domain, n.variable)?;

        let mut count = BigUint::ZERO;
        for child in [n.low, n.high] {
            let below = level(domain, self.arena().variable(child)?)?;
            let skipped = below - here - 1;
            count += self._count_sat(child, domain, cache)? << skipped;
        }

        cache.insert(node, count.clone());
        Ok(count)
    }
}

/// Position of `variable` in the sorted `domain`; terminals sit below the last variable.
fn level(domain: &[u32], variable: u32) -> Result<usize> {
    if variable == TERMINAL_VARIABLE {
        return Ok(domain.len());
    }
    domain
        .binary_search(&variable)
        .map_err(|_| Violation::OutOfDomain { variable }.into())
}
