//! Sparse element→node adjacency container.
//!
//! `OneToMany` stores one ordered row of node ids per element. Element
//! ids are dense `[0, count)`; node ids are arbitrary non-negative
//! integers. Row order is significant and preserved by every operation
//! that does not explicitly sort.
//!
//! The container splits into:
//! - this module: construction, mutation, renumbering, equality/ordering
//! - [`algebra`]: union/intersection/difference and the symbolic product
//! - [`transpose`]: inverse relation, occurrence positions, clique rows
//! - [`order`]: topological order, acyclicity, connected components
//! - [`interop`]: CSR and dense boolean-matrix round-trips
//! - [`random`]: seeded Bernoulli generation
//!
//! # Example
//!
//! ```
//! use relmat::OneToMany;
//!
//! let mut rel = OneToMany::new();
//! rel.append_element(vec![0, 2]);
//! rel.append_element(vec![1]);
//! assert_eq!(rel.count(), 2);
//! assert_eq!(rel.max_node(), Some(2));
//! assert_eq!(&rel[0], &[0, 2]);
//! ```

mod algebra;
mod interop;
mod order;
mod random;
mod transpose;

pub use interop::CsrMatrix;
pub use random::random_o2m;
pub(crate) use transpose::occurrence_positions;

use crate::error::{RelationError, Result};
use crate::membership::NodeSet;
use crate::sorted;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

/// Sentinel marking the max-node cache as invalidated.
const CACHE_DIRTY: i64 = i64::MIN;

fn dirty_cache() -> AtomicI64 {
    AtomicI64::new(CACHE_DIRTY)
}

/// Sparse row-indexed relation from elements to nodes.
#[derive(Debug, Serialize, Deserialize)]
pub struct OneToMany {
    rows: Vec<Vec<usize>>,
    /// `CACHE_DIRTY` when stale, otherwise the max node id (-1 = empty).
    #[serde(skip, default = "dirty_cache")]
    max_node_cache: AtomicI64,
}

/// Shape summary of a relation, as reported by [`OneToMany::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationStats {
    pub elements: usize,
    pub entries: usize,
    pub max_node: Option<usize>,
    /// Entries over the dense `elements × node_space` capacity.
    pub density: f64,
}

impl OneToMany {
    /// Create an empty relation.
    pub fn new() -> Self {
        OneToMany {
            rows: Vec::new(),
            max_node_cache: AtomicI64::new(-1),
        }
    }

    /// Create an empty relation with room for `elements` rows.
    pub fn with_capacity(elements: usize) -> Self {
        OneToMany {
            rows: Vec::with_capacity(elements),
            max_node_cache: AtomicI64::new(-1),
        }
    }

    /// Adopt an existing adjacency. The rows are taken as-is, including
    /// their order and any duplicates (`validate` rejects the latter).
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Self {
        OneToMany {
            rows,
            max_node_cache: dirty_cache(),
        }
    }

    /// Number of elements (rows).
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of (element, node) entries.
    pub fn entry_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Borrow the underlying adjacency.
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Iterate over rows as slices.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Bounds-checked row access.
    pub fn row(&self, element: usize) -> Result<&[usize]> {
        self.rows
            .get(element)
            .map(Vec::as_slice)
            .ok_or(RelationError::ElementOutOfBounds {
                element,
                count: self.rows.len(),
            })
    }

    /// Largest node id appearing in any row, or `None` when the relation
    /// holds no entries. Cached; every mutation invalidates the cache.
    pub fn max_node(&self) -> Option<usize> {
        let cached = self.max_node_cache.load(AtomicOrdering::Relaxed);
        if cached != CACHE_DIRTY {
            return usize::try_from(cached).ok();
        }
        let computed = self.rows.iter().flatten().copied().max();
        self.max_node_cache.store(
            computed.map_or(-1, |m| m as i64),
            AtomicOrdering::Relaxed,
        );
        computed
    }

    /// `max_node() + 1`, or 0 when the relation holds no entries.
    pub fn node_space(&self) -> usize {
        self.max_node().map_or(0, |m| m + 1)
    }

    /// Shape summary: counts, max node and fill density.
    pub fn stats(&self) -> RelationStats {
        let entries = self.entry_count();
        let capacity = self.count() * self.node_space();
        RelationStats {
            elements: self.count(),
            entries,
            max_node: self.max_node(),
            density: if capacity == 0 {
                0.0
            } else {
                entries as f64 / capacity as f64
            },
        }
    }

    /// Check that no row lists the same node twice.
    pub fn validate(&self) -> Result<()> {
        let mut seen = NodeSet::with_domain(self.node_space());
        for (element, row) in self.rows.iter().enumerate() {
            seen.clear();
            for &node in row {
                if !seen.insert(node) {
                    return Err(RelationError::DuplicateNode { element, node });
                }
            }
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.max_node_cache
            .store(CACHE_DIRTY, AtomicOrdering::Relaxed);
    }

    /// Append a row and return its element id.
    pub fn append_element(&mut self, row: Vec<usize>) -> usize {
        self.rows.push(row);
        self.touch();
        self.rows.len() - 1
    }

    /// Append several rows at once.
    pub fn append_elements<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = Vec<usize>>,
    {
        self.rows.extend(rows);
        self.touch();
    }

    /// Append `node` to the row of `element`.
    pub fn append_node(&mut self, element: usize, node: usize) -> Result<()> {
        let count = self.rows.len();
        let row = self
            .rows
            .get_mut(element)
            .ok_or(RelationError::ElementOutOfBounds { element, count })?;
        row.push(node);
        self.touch();
        Ok(())
    }

    /// Remove the first occurrence of `node` from the row of `element`.
    /// Returns whether an occurrence was removed.
    pub fn remove_node(&mut self, element: usize, node: usize) -> Result<bool> {
        let count = self.rows.len();
        let row = self
            .rows
            .get_mut(element)
            .ok_or(RelationError::ElementOutOfBounds { element, count })?;
        match row.iter().position(|&n| n == node) {
            Some(at) => {
                row.remove(at);
                self.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Empty the row of `element` while keeping the element id.
    pub fn clear_element(&mut self, element: usize) -> Result<()> {
        let count = self.rows.len();
        let row = self
            .rows
            .get_mut(element)
            .ok_or(RelationError::ElementOutOfBounds { element, count })?;
        row.clear();
        self.touch();
        Ok(())
    }

    /// Replace the row of `element` wholesale.
    pub fn replace_element(&mut self, element: usize, row: Vec<usize>) -> Result<()> {
        let count = self.rows.len();
        let slot = self
            .rows
            .get_mut(element)
            .ok_or(RelationError::ElementOutOfBounds { element, count })?;
        *slot = row;
        self.touch();
        Ok(())
    }

    /// Drop every element and row.
    pub fn clear_all(&mut self) {
        self.rows.clear();
        self.touch();
    }

    /// Reserve room for `additional` more rows.
    pub fn reserve(&mut self, additional: usize) {
        self.rows.reserve(additional);
    }

    /// Rebuild the adjacency so that new index `k` holds the row at old
    /// index `new_to_old[k]`. Out-of-range and repeated old indices are
    /// skipped; each old row is consumed at most once.
    pub fn compress_elements(&mut self, new_to_old: &[usize]) {
        let mut taken = vec![false; self.rows.len()];
        let mut new_rows = Vec::with_capacity(new_to_old.len());
        for &old in new_to_old {
            if old < self.rows.len() && !taken[old] {
                taken[old] = true;
                new_rows.push(std::mem::take(&mut self.rows[old]));
            }
        }
        self.rows = new_rows;
        self.touch();
    }

    /// Reorder rows so the row at old index `i` lands at `old_to_new[i]`.
    /// When the map is not a permutation of `[0, count)`, degrades to
    /// [`compress_elements`](Self::compress_elements) over the same map.
    pub fn permute_elements(&mut self, old_to_new: &[usize]) {
        let count = self.rows.len();
        let valid = old_to_new.len() == count && {
            let mut seen = vec![false; count];
            old_to_new
                .iter()
                .all(|&to| to < count && !std::mem::replace(&mut seen[to], true))
        };
        if !valid {
            self.compress_elements(old_to_new);
            return;
        }
        let mut new_rows: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (old, row) in self.rows.iter_mut().enumerate() {
            new_rows[old_to_new[old]] = std::mem::take(row);
        }
        self.rows = new_rows;
        self.touch();
    }

    /// Remap node values through `old_to_new`. Values beyond the map are
    /// left untouched; values mapped to a negative id are removed.
    pub fn permute_nodes(&mut self, old_to_new: &[isize]) {
        for row in &mut self.rows {
            row.retain_mut(|node| {
                if *node < old_to_new.len() {
                    let mapped = old_to_new[*node];
                    if mapped < 0 {
                        false
                    } else {
                        *node = mapped as usize;
                        true
                    }
                } else {
                    true
                }
            });
        }
        self.touch();
    }

    /// Joint renumbering of both id spaces: compress the element axis,
    /// then remap the node axis.
    pub fn rearrange(&mut self, new_to_old_elem: &[usize], old_to_new_node: &[isize]) {
        self.compress_elements(new_to_old_elem);
        self.permute_nodes(old_to_new_node);
    }

    /// Whether the two relations hold the same multiset of rows.
    pub fn is_permutation_of(&self, other: &Self) -> bool {
        if self.rows.len() != other.rows.len() {
            return false;
        }
        let mut a: Vec<&Vec<usize>> = self.rows.iter().collect();
        let mut b: Vec<&Vec<usize>> = other.rows.iter().collect();
        a.sort_unstable_by(|x, y| sorted::compare(x, y));
        b.sort_unstable_by(|x, y| sorted::compare(x, y));
        a == b
    }
}

impl Default for OneToMany {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for OneToMany {
    fn clone(&self) -> Self {
        OneToMany {
            rows: self.rows.clone(),
            max_node_cache: AtomicI64::new(self.max_node_cache.load(AtomicOrdering::Relaxed)),
        }
    }
}

impl From<Vec<Vec<usize>>> for OneToMany {
    fn from(rows: Vec<Vec<usize>>) -> Self {
        Self::from_rows(rows)
    }
}

impl PartialEq for OneToMany {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl Eq for OneToMany {}

impl PartialOrd for OneToMany {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Row-count first, then row-wise lexicographic with length tie-breaks.
impl Ord for OneToMany {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rows.len().cmp(&other.rows.len()).then_with(|| {
            for (a, b) in self.rows.iter().zip(other.rows.iter()) {
                match sorted::compare(a, b) {
                    Ordering::Equal => {}
                    decided => return decided,
                }
            }
            Ordering::Equal
        })
    }
}

impl Index<usize> for OneToMany {
    type Output = [usize];

    fn index(&self, element: usize) -> &[usize] {
        &self.rows[element]
    }
}

impl fmt::Display for OneToMany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (element, row) in self.rows.iter().enumerate() {
            write!(f, "{element}:")?;
            for node in row {
                write!(f, " {node}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Map a function over rows, in parallel above the configured workload
/// threshold.
pub(crate) fn map_rows_indexed<F>(rows: &[Vec<usize>], f: F) -> Vec<Vec<usize>>
where
    F: Fn(usize, &[usize]) -> Vec<usize> + Sync,
{
    use rayon::prelude::*;

    if rows.len() >= crate::config::parallel_threshold() {
        rows.par_iter()
            .enumerate()
            .map(|(i, row)| f(i, row))
            .collect()
    } else {
        rows.iter().enumerate().map(|(i, row)| f(i, row)).collect()
    }
}
