//! Bidirectional relation: a forward adjacency plus a synchronized
//! inverse view and reciprocal position tables.
//!
//! ## Synchronization contract
//!
//! ```text
//! ManyToMany
//!   |-- forward: OneToMany            (element -> nodes, owned)
//!   `-- Mutex<InverseCache>
//!         |-- inverse: OneToMany      (node -> elements, transpose)
//!         |-- elem_loc[e][k]          (position of e in inverse[forward[e][k]])
//!         |-- node_loc[n][k]          (position of n in forward[inverse[n][k]])
//!         `-- in_sync flag
//! ```
//!
//! Every mutation marks the cache dirty and, outside batch mode,
//! rebuilds it eagerly. Every read that names the inverse or the
//! position tables synchronizes first, so a query observed after a
//! committed mutation always sees `inverse == transpose(forward)`.
//! Mutations take `&mut self`, which gives cross-operation exclusivity;
//! the mutex makes concurrent `&self` readers safe to race on the lazy
//! rebuild.

use crate::error::{RelationError, Result};
use crate::one_to_many::{occurrence_positions, OneToMany};
use crate::sorted;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use tracing::debug;

#[derive(Debug, Default)]
struct InverseCache {
    inverse: OneToMany,
    elem_loc: Vec<Vec<usize>>,
    node_loc: Vec<Vec<usize>>,
    in_sync: bool,
}

fn rebuild(forward: &OneToMany, cache: &mut InverseCache) {
    debug!(
        elements = forward.count(),
        entries = forward.entry_count(),
        "rebuilding inverse and position caches"
    );
    cache.inverse = forward.transpose();
    cache.elem_loc = occurrence_positions(forward, &cache.inverse);
    cache.node_loc = occurrence_positions(&cache.inverse, forward);
    cache.in_sync = true;
}

/// A [`OneToMany`] with a lazily maintained inverse and position caches.
#[derive(Debug)]
pub struct ManyToMany {
    forward: OneToMany,
    cache: Mutex<InverseCache>,
    batch: bool,
}

impl ManyToMany {
    pub fn new() -> Self {
        ManyToMany {
            forward: OneToMany::new(),
            cache: Mutex::new(InverseCache {
                in_sync: true,
                ..InverseCache::default()
            }),
            batch: false,
        }
    }

    pub fn with_capacity(elements: usize) -> Self {
        let mut m2m = Self::new();
        m2m.forward.reserve(elements);
        m2m
    }

    /// Borrow the forward relation for read-only O2M operations.
    pub fn forward(&self) -> &OneToMany {
        &self.forward
    }

    pub fn count(&self) -> usize {
        self.forward.count()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn row(&self, element: usize) -> Result<&[usize]> {
        self.forward.row(element)
    }

    pub fn max_node(&self) -> Option<usize> {
        self.forward.max_node()
    }

    pub fn node_space(&self) -> usize {
        self.forward.node_space()
    }

    /// Whether the inverse and position caches reflect the forward
    /// adjacency right now.
    pub fn is_synchronized(&self) -> bool {
        self.cache.lock().in_sync
    }

    /// Suppress eager cache rebuilds between successive mutations.
    pub fn begin_batch(&mut self) {
        self.batch = true;
    }

    /// Leave batch mode; re-synchronizes if any mutation landed while
    /// batched.
    pub fn end_batch(&mut self) {
        self.batch = false;
        let cache = self.cache.get_mut();
        if !cache.in_sync {
            rebuild(&self.forward, cache);
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch
    }

    fn after_mutation(&mut self) {
        let cache = self.cache.get_mut();
        cache.in_sync = false;
        if !self.batch {
            rebuild(&self.forward, cache);
        }
    }

    fn synced(&self) -> MutexGuard<'_, InverseCache> {
        let mut guard = self.cache.lock();
        if !guard.in_sync {
            rebuild(&self.forward, &mut guard);
        }
        guard
    }

    // === Mutations (each invalidates the caches) ===

    pub fn append_element(&mut self, row: Vec<usize>) -> usize {
        let id = self.forward.append_element(row);
        self.after_mutation();
        id
    }

    pub fn append_elements<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = Vec<usize>>,
    {
        self.forward.append_elements(rows);
        self.after_mutation();
    }

    pub fn append_node(&mut self, element: usize, node: usize) -> Result<()> {
        self.forward.append_node(element, node)?;
        self.after_mutation();
        Ok(())
    }

    pub fn remove_node(&mut self, element: usize, node: usize) -> Result<bool> {
        let removed = self.forward.remove_node(element, node)?;
        if removed {
            self.after_mutation();
        }
        Ok(removed)
    }

    pub fn clear_element(&mut self, element: usize) -> Result<()> {
        self.forward.clear_element(element)?;
        self.after_mutation();
        Ok(())
    }

    pub fn replace_element(&mut self, element: usize, row: Vec<usize>) -> Result<()> {
        self.forward.replace_element(element, row)?;
        self.after_mutation();
        Ok(())
    }

    pub fn compress_elements(&mut self, new_to_old: &[usize]) {
        self.forward.compress_elements(new_to_old);
        self.after_mutation();
    }

    pub fn permute_elements(&mut self, old_to_new: &[usize]) {
        self.forward.permute_elements(old_to_new);
        self.after_mutation();
    }

    pub fn permute_nodes(&mut self, old_to_new: &[isize]) {
        self.forward.permute_nodes(old_to_new);
        self.after_mutation();
    }

    pub fn rearrange(&mut self, new_to_old_elem: &[usize], old_to_new_node: &[isize]) {
        self.forward.rearrange(new_to_old_elem, old_to_new_node);
        self.after_mutation();
    }

    /// Drop the adjacency and every derived cache.
    pub fn clear_all(&mut self) {
        self.forward.clear_all();
        let cache = self.cache.get_mut();
        *cache = InverseCache::default();
        cache.in_sync = true;
    }

    // === Synchronized reads ===

    /// Elements whose row contains `node`, ascending. Out-of-range
    /// nodes yield an empty list.
    pub fn elements_from_node(&self, node: usize) -> Vec<usize> {
        let guard = self.synced();
        guard.inverse.rows().get(node).cloned().unwrap_or_default()
    }

    /// Clone of the synchronized inverse relation.
    pub fn inverse(&self) -> OneToMany {
        self.synced().inverse.clone()
    }

    /// Position of `element` within `inverse[forward[element][k]]`.
    pub fn element_location(&self, element: usize, k: usize) -> Result<usize> {
        let guard = self.synced();
        let row = guard
            .elem_loc
            .get(element)
            .ok_or(RelationError::ElementOutOfBounds {
                element,
                count: self.forward.count(),
            })?;
        row.get(k)
            .copied()
            .ok_or(RelationError::OffsetOutOfBounds {
                offset: k,
                len: row.len(),
            })
    }

    /// Position of `node` within `forward[inverse[node][k]]`.
    pub fn node_location(&self, node: usize, k: usize) -> Result<usize> {
        let guard = self.synced();
        let bound = guard.node_loc.len();
        let row = guard
            .node_loc
            .get(node)
            .ok_or(RelationError::NodeOutOfBounds { node, bound })?;
        row.get(k)
            .copied()
            .ok_or(RelationError::OffsetOutOfBounds {
                offset: k,
                len: row.len(),
            })
    }

    /// Elements whose row is a superset of `nodes`: the intersection of
    /// the inverse rows, ascending, short-circuiting on empty. Any
    /// out-of-range node yields an empty result.
    pub fn elements_with_nodes(&self, nodes: &[usize]) -> Vec<usize> {
        let guard = self.synced();
        let Some((&first, rest)) = nodes.split_first() else {
            return Vec::new();
        };
        let Some(row) = guard.inverse.rows().get(first) else {
            return Vec::new();
        };
        let mut acc = row.clone();
        sorted::sort_unique(&mut acc);
        for &n in rest {
            if acc.is_empty() {
                return acc;
            }
            let Some(row) = guard.inverse.rows().get(n) else {
                return Vec::new();
            };
            acc = sorted::intersect(&acc, row);
        }
        acc
    }

    /// Elements that consist of exactly `nodes`: the subset of
    /// [`elements_with_nodes`](Self::elements_with_nodes) whose row has
    /// exactly `nodes.len()` entries.
    pub fn elements_from_nodes(&self, nodes: &[usize]) -> Vec<usize> {
        self.elements_with_nodes(nodes)
            .into_iter()
            .filter(|&e| self.forward[e].len() == nodes.len())
            .collect()
    }

    /// Elements sharing at least one node with `element`, ascending,
    /// excluding `element` itself.
    pub fn element_neighbours(&self, element: usize) -> Result<Vec<usize>> {
        let nodes = self.forward.row(element)?.to_vec();
        let guard = self.synced();
        let mut out = Vec::new();
        for n in nodes {
            if let Some(row) = guard.inverse.rows().get(n) {
                out.extend_from_slice(row);
            }
        }
        drop(guard);
        sorted::sort_unique(&mut out);
        out.retain(|&e| e != element);
        Ok(out)
    }

    /// Nodes sharing at least one element with `node`, ascending,
    /// excluding `node` itself. Out-of-range nodes yield an empty list.
    pub fn node_neighbours(&self, node: usize) -> Vec<usize> {
        let guard = self.synced();
        let Some(elements) = guard.inverse.rows().get(node) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &e in elements {
            out.extend_from_slice(&self.forward[e]);
        }
        drop(guard);
        sorted::sort_unique(&mut out);
        out.retain(|&n| n != node);
        out
    }

    /// Element-sharing-a-node graph: `forward × inverse`.
    pub fn elements_to_elements(&self) -> OneToMany {
        let guard = self.synced();
        self.forward.multiply(&guard.inverse)
    }

    /// Node-sharing-an-element graph: `inverse × forward`.
    pub fn nodes_to_nodes(&self) -> OneToMany {
        let guard = self.synced();
        guard.inverse.multiply(&self.forward)
    }

    /// Dense clique expansion over the synchronized pair; see
    /// [`OneToMany::cliques_of`].
    pub fn cliques(&self) -> OneToMany {
        let guard = self.synced();
        OneToMany::cliques_of(&self.forward, &guard.inverse)
    }

    /// Component id per element over the element-sharing graph.
    pub fn element_components(&self) -> Vec<usize> {
        let mut components = self.elements_to_elements().connected_components();
        components.truncate(self.forward.count());
        components
    }
}

impl Default for ManyToMany {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ManyToMany {
    /// Deep-copies the forward adjacency; caches are dropped and
    /// rebuilt on the next synchronized read.
    fn clone(&self) -> Self {
        ManyToMany {
            forward: self.forward.clone(),
            cache: Mutex::new(InverseCache::default()),
            batch: false,
        }
    }
}

impl From<OneToMany> for ManyToMany {
    fn from(forward: OneToMany) -> Self {
        ManyToMany {
            forward,
            cache: Mutex::new(InverseCache::default()),
            batch: false,
        }
    }
}

impl PartialEq for ManyToMany {
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward
    }
}

impl Eq for ManyToMany {}

impl fmt::Display for ManyToMany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.forward, f)
    }
}
