//! Boolean operations on top of the node store.
//!
//! All operations are methods of [`Manager`]. Binary operators use Shannon
//! expansion on the top variable of their operands and are memoized in the
//! computed table, so each distinct pair of operands is expanded at most once
//! (modulo cache collisions).
//!
//! ```
//! use hermes_bdd::config::BddConfig;
//! use hermes_bdd::manager::Manager;
//!
//! # fn main() -> hermes_bdd::error::Result<()> {
//! let bdd = Manager::new(BddConfig::default().with_node_capacity(1024).with_cache_bits(10))?;
//! let x = bdd.mk_var(0)?;
//! let y = bdd.mk_var(1)?;
//! let f = bdd.apply_and(x, bdd.apply_not(y)?)?;
//! assert_eq!(f, bdd.apply_and(bdd.apply_not(y)?, x)?);
//! assert!(!bdd.is_zero(f));
//! # Ok(())
//! # }
//! ```

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::cache::Op;
use crate::error::{Result, Violation};
use crate::manager::Manager;
use crate::reference::Ref;

impl Manager {
    pub fn zero(&self) -> Ref {
        Ref::FALSE
    }
    pub fn one(&self) -> Ref {
        Ref::TRUE
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == Ref::FALSE
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == Ref::TRUE
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.is_terminal()
    }

    /// The function `x_v`.
    pub fn mk_var(&self, v: u32) -> Result<Ref> {
        self.mk_node(v, Ref::FALSE, Ref::TRUE)
    }

    /// The function `¬x_v`.
    pub fn mk_nvar(&self, v: u32) -> Result<Ref> {
        self.mk_node(v, Ref::TRUE, Ref::FALSE)
    }

    /// Cofactors of `node` with respect to `v`, which must not lie below its top variable.
    pub fn top_cofactors(&self, node: Ref, v: u32) -> Result<(Ref, Ref)> {
        if node.is_terminal() {
            return Ok((node, node));
        }
        let n = self.arena().node(node)?;
        if v < n.variable {
            return Ok((node, node));
        }
        if v > n.variable {
            return Err(Violation::Ordering {
                variable: v,
                child_variable: n.variable,
            }
            .into());
        }
        Ok((n.low, n.high))
    }

    pub fn apply_not(&self, f: Ref) -> Result<Ref> {
        debug!("apply_not(f = {})", f);

        if let Some(b) = f.as_bool() {
            return Ok(Ref::from(!b));
        }
        if let Some(res) = self.computed_get(Op::Not, &[f]) {
            debug!("cache: apply_not(f = {}) -> {}", f, res);
            return Ok(res);
        }

        let n = self.arena().node(f)?;
        let low = self.apply_not(n.low)?;
        let high = self.apply_not(n.high)?;
        let res = self.mk_node(n.variable, low, high)?;
        self.computed_put(Op::Not, &[f], res);
        Ok(res)
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_and(u = {}, v = {})", u, v);
        self.apply(Op::And, u, v)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_or(u = {}, v = {})", u, v);
        self.apply(Op::Or, u, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_xor(u = {}, v = {})", u, v);
        self.apply(Op::Xor, u, v)
    }

    /// `u → v`, i.e. `¬u ∨ v`.
    pub fn apply_imply(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_imply(u = {}, v = {})", u, v);
        self.apply(Op::Imply, u, v)
    }

    pub fn apply_equiv(&self, u: Ref, v: Ref) -> Result<Ref> {
        debug!("apply_equiv(u = {}, v = {})", u, v);
        self.apply(Op::Equiv, u, v)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Result<Ref> {
        debug!("apply_and_many(...)");
        let mut res = Ref::TRUE;
        for node in nodes {
            res = self.apply_and(res, node)?;
        }
        Ok(res)
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Result<Ref> {
        debug!("apply_or_many(...)");
        let mut res = Ref::FALSE;
        for node in nodes {
            res = self.apply_or(res, node)?;
        }
        Ok(res)
    }

    /// Results that need no expansion.
    fn terminal_case(&self, op: Op, f: Ref, g: Ref) -> Result<Option<Ref>> {
        let res = match op {
            Op::And => match (f.as_bool(), g.as_bool()) {
                (Some(false), _) | (_, Some(false)) => Some(Ref::FALSE),
                (Some(true), _) => Some(g),
                (_, Some(true)) => Some(f),
                _ if f == g => Some(f),
                _ => None,
            },
            Op::Or => match (f.as_bool(), g.as_bool()) {
                (Some(true), _) | (_, Some(true)) => Some(Ref::TRUE),
                (Some(false), _) => Some(g),
                (_, Some(false)) => Some(f),
                _ if f == g => Some(f),
                _ => None,
            },
            Op::Xor => match (f.as_bool(), g.as_bool()) {
                _ if f == g => Some(Ref::FALSE),
                (Some(false), _) => Some(g),
                (_, Some(false)) => Some(f),
                (Some(true), _) => Some(self.apply_not(g)?),
                (_, Some(true)) => Some(self.apply_not(f)?),
                _ => None,
            },
            Op::Equiv => match (f.as_bool(), g.as_bool()) {
                _ if f == g => Some(Ref::TRUE),
                (Some(true), _) => Some(g),
                (_, Some(true)) => Some(f),
                (Some(false), _) => Some(self.apply_not(g)?),
                (_, Some(false)) => Some(self.apply_not(f)?),
                _ => None,
            },
            Op::Imply => match (f.as_bool(), g.as_bool()) {
                (Some(false), _) | (_, Some(true)) => Some(Ref::TRUE),
                _ if f == g => Some(Ref::TRUE),
                (Some(true), _) => Some(g),
                (_, Some(false)) => Some(self.apply_not(f)?),
                _ => None,
            },
            Op::Not | Op::Ite => None,
        };
        Ok(res)
    }

    fn apply(&self, op: Op, f: Ref, g: Ref) -> Result<Ref> {
        debug_assert_eq!(op.arity(), 2);

        if let Some(res) = self.terminal_case(op, f, g)? {
            return Ok(res);
        }

        // `f op g` and `g op f` share one memo entry.
        let (f, g) = if op.is_commutative() && g < f {
            (g, f)
        } else {
            (f, g)
        };

        if let Some(res) = self.computed_get(op, &[f, g]) {
            debug!("cache: {:?}(f = {}, g = {}) -> {}", op, f, g, res);
            return Ok(res);
        }

        // At least one operand is a decision node here.
        let m = self.arena().variable(f)?.min(self.arena().variable(g)?);
        let (f0, f1) = self.top_cofactors(f, m)?;
        let (g0, g1) = self.top_cofactors(g, m)?;

        let low = self.apply(op, f0, g0)?;
        let high = self.apply(op, f1, g1)?;
        let res = self.mk_node(m, low, high)?;
        debug!("computed: {:?}(f = {}, g = {}) -> {}", op, f, g, res);

        self.computed_put(op, &[f, g], res);
        Ok(res)
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Result<Ref> {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        match f.as_bool() {
            Some(true) => return Ok(g),
            Some(false) => return Ok(h),
            None => {}
        }
        if g == h {
            return Ok(g);
        }
        match (g.as_bool(), h.as_bool()) {
            (Some(true), Some(false)) => return Ok(f),
            (Some(false), Some(true)) => return self.apply_not(f),
            _ => {}
        }

        if let Some(res) = self.computed_get(Op::Ite, &[f, g, h]) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return Ok(res);
        }

        let arena = self.arena();
        let m = arena
            .variable(f)?
            .min(arena.variable(g)?)
            .min(arena.variable(h)?);

        let (f0, f1) = self.top_cofactors(f, m)?;
        let (g0, g1) = self.top_cofactors(g, m)?;
        let (h0, h1) = self.top_cofactors(h, m)?;

        let e = self.apply_ite(f0, g0, h0)?;
        let t = self.apply_ite(f1, g1, h1)?;
        let res = self.mk_node(m, e, t)?;

        self.computed_put(Op::Ite, &[f, g, h], res);
        Ok(res)
    }

    /// All nodes reachable from `nodes`, terminals included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> Result<HashSet<Ref>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            if visited.insert(node) && !node.is_terminal() {
                let n = self.arena().node(node)?;
                queue.push_back(n.low);
                queue.push_back(n.high);
            }
        }

        Ok(visited)
    }

    /// Number of distinct nodes of `f`, reachable terminals included.
    pub fn size(&self, f: Ref) -> Result<usize> {
        Ok(self.descendants([f])?.len())
    }

    pub fn to_bracket_string(&self, node: Ref) -> Result<String> {
        match node.as_bool() {
            Some(false) => return Ok("(0)".to_string()),
            Some(true) => return Ok("(1)".to_string()),
            None => {}
        }

        let n = self.arena().node(node)?;
        Ok(format!(
            "{}:(x{}, {}, {})",
            node,
            n.variable,
            self.to_bracket_string(n.high)?,
            self.to_bracket_string(n.low)?
        ))
    }

    /// Print a named listing of the nodes of `f` to stdout, root first.
    pub fn print(&self, f: Ref, name: &str) -> Result<()> {
        println!("{}", self.listing(f, name)?);
        Ok(())
    }

    fn listing(&self, f: Ref, name: &str) -> Result<String> {
        let mut lines = vec![format!("{} (root {}):", name, f)];
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([f]);

        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            match node.as_bool() {
                Some(b) => lines.push(format!("  {} = {}", node, b)),
                None => {
                    let n = self.arena().node(node)?;
                    lines.push(format!(
                        "  {} = x{} ? {} : {}",
                        node, n.variable, n.high, n.low
                    ));
                    queue.push_back(n.high);
                    queue.push_back(n.low);
                }
            }
        }

        Ok(lines.join("\n"))
    }
}
