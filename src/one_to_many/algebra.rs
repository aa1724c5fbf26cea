//! Row-wise boolean algebra and the symbolic product.
//!
//! Union, intersection, difference and symmetric difference pair rows
//! by element id and preserve the left operand's ordering, with right
//! additions appended in source order. The symbolic product is the
//! boolean matrix multiplication over row unions; its row order is
//! unspecified because the parallel path may differ from the serial
//! one, so callers should treat product rows as sets.

use super::{map_rows_indexed, OneToMany};
use crate::membership::NodeSet;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Sub};

const EMPTY_ROW: &[usize] = &[];

fn row_or_empty(rel: &OneToMany, element: usize) -> &[usize] {
    rel.rows().get(element).map_or(EMPTY_ROW, Vec::as_slice)
}

impl OneToMany {
    /// Symbolic boolean product: row `i` of the result is the
    /// deduplicated union of `other[m]` over `m ∈ self[i]`.
    ///
    /// When `self.max_node() < other.count()` every index is known to be
    /// in range and the per-entry bound test is skipped.
    pub fn multiply(&self, other: &Self) -> Self {
        let need_check = self.max_node().is_some_and(|m| m >= other.count());
        let domain = other.node_space();
        let rows = map_rows_indexed(self.rows(), |_, row| {
            let mut seen = NodeSet::with_domain(domain);
            let mut out = Vec::new();
            for &m in row {
                if need_check && m >= other.count() {
                    continue;
                }
                for &v in &other[m] {
                    if seen.insert(v) {
                        out.push(v);
                    }
                }
            }
            out
        });
        OneToMany::from_rows(rows)
    }

    /// Per-row union: `self[i]` in source order (deduplicated), then the
    /// entries of `other[i]` not already present. Short relations pair
    /// their missing rows with empty ones.
    pub fn union(&self, other: &Self) -> Self {
        let count = self.count().max(other.count());
        let domain = self.node_space().max(other.node_space());
        let mut seen = NodeSet::with_domain(domain);
        let mut rows = Vec::with_capacity(count);
        for i in 0..count {
            seen.clear();
            let a = row_or_empty(self, i);
            let b = row_or_empty(other, i);
            let mut row = Vec::with_capacity(a.len() + b.len());
            for &v in a {
                if seen.insert(v) {
                    row.push(v);
                }
            }
            for &v in b {
                if seen.insert(v) {
                    row.push(v);
                }
            }
            rows.push(row);
        }
        OneToMany::from_rows(rows)
    }

    /// Per-row intersection in the left operand's order, deduplicated.
    pub fn intersection(&self, other: &Self) -> Self {
        let count = self.count().min(other.count());
        let domain = self.node_space().max(other.node_space());
        let mut membership = NodeSet::with_domain(domain);
        let mut emitted = NodeSet::with_domain(domain);
        let mut rows = Vec::with_capacity(count);
        for i in 0..count {
            membership.clear();
            emitted.clear();
            for &v in row_or_empty(other, i) {
                membership.insert(v);
            }
            let mut row = Vec::new();
            for &v in row_or_empty(self, i) {
                if membership.contains(v) && emitted.insert(v) {
                    row.push(v);
                }
            }
            rows.push(row);
        }
        OneToMany::from_rows(rows)
    }

    /// Per-row difference `self[i] − other[i]` in the left operand's
    /// order, deduplicated.
    pub fn difference(&self, other: &Self) -> Self {
        let count = self.count();
        let domain = self.node_space().max(other.node_space());
        let mut membership = NodeSet::with_domain(domain);
        let mut emitted = NodeSet::with_domain(domain);
        let mut rows = Vec::with_capacity(count);
        for i in 0..count {
            membership.clear();
            emitted.clear();
            for &v in row_or_empty(other, i) {
                membership.insert(v);
            }
            let mut row = Vec::new();
            for &v in row_or_empty(self, i) {
                if !membership.contains(v) && emitted.insert(v) {
                    row.push(v);
                }
            }
            rows.push(row);
        }
        OneToMany::from_rows(rows)
    }

    /// Per-row symmetric difference, defined as `(self ∪ other) −
    /// (self ∩ other)`.
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.union(other).difference(&self.intersection(other))
    }
}

impl Mul<&OneToMany> for &OneToMany {
    type Output = OneToMany;

    fn mul(self, rhs: &OneToMany) -> OneToMany {
        self.multiply(rhs)
    }
}

impl BitOr<&OneToMany> for &OneToMany {
    type Output = OneToMany;

    fn bitor(self, rhs: &OneToMany) -> OneToMany {
        self.union(rhs)
    }
}

impl Add<&OneToMany> for &OneToMany {
    type Output = OneToMany;

    fn add(self, rhs: &OneToMany) -> OneToMany {
        self.union(rhs)
    }
}

impl BitAnd<&OneToMany> for &OneToMany {
    type Output = OneToMany;

    fn bitand(self, rhs: &OneToMany) -> OneToMany {
        self.intersection(rhs)
    }
}

impl Sub<&OneToMany> for &OneToMany {
    type Output = OneToMany;

    fn sub(self, rhs: &OneToMany) -> OneToMany {
        self.difference(rhs)
    }
}

impl BitXor<&OneToMany> for &OneToMany {
    type Output = OneToMany;

    fn bitxor(self, rhs: &OneToMany) -> OneToMany {
        self.symmetric_difference(rhs)
    }
}
