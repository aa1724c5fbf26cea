//! T×T grid of typed relations with cascading deletion.
//!
//! Cell `(i, j)` models "elements of type `i` are made of nodes of type
//! `j`"; the diagonal cell carries the canonical self-list of type `i`
//! entities. Deletion is two-phase: [`TypedMatrix::mark_to_erase`] walks
//! the cross-type relations and marks everything that transitively
//! references a doomed id, then a single [`TypedMatrix::compress`]
//! renumbers every surviving id jointly across all cells, so no dangling
//! reference remains.
//!
//! ```text
//! TypedMatrix (T types)
//!   |-- cells[i * T + j]: ManyToMany   (type-i elements -> type-j nodes)
//!   `-- marked[t]: BTreeSet<usize>     (type-t ids scheduled for erasure)
//! ```

use crate::error::{RelationError, Result};
use crate::many_to_many::ManyToMany;
use crate::one_to_many::OneToMany;
use crate::renumber::{survivor_maps, SurvivorMaps};
use crate::sorted;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Index, IndexMut};
use tracing::debug;

/// A `(type, id)` pair, ordered by type first.
pub type TypedPair = (usize, usize);

/// N×N matrix of [`ManyToMany`] cells with per-type kill lists.
#[derive(Debug)]
pub struct TypedMatrix {
    types: usize,
    /// Row-major `types × types` grid.
    cells: Vec<ManyToMany>,
    marked: Vec<BTreeSet<usize>>,
}

impl TypedMatrix {
    /// Allocate a `types × types` grid of empty relations.
    pub fn new(types: usize) -> Result<Self> {
        if types == 0 {
            return Err(RelationError::EmptyTypeCount);
        }
        Ok(TypedMatrix {
            types,
            cells: (0..types * types).map(|_| ManyToMany::new()).collect(),
            marked: vec![BTreeSet::new(); types],
        })
    }

    /// Number of types (the grid is `types × types`).
    pub fn types(&self) -> usize {
        self.types
    }

    fn check_type(&self, index: usize) -> Result<()> {
        if index < self.types {
            Ok(())
        } else {
            Err(RelationError::TypeOutOfBounds {
                index,
                types: self.types,
            })
        }
    }

    /// Bounds-checked cell access.
    pub fn cell(&self, elem_type: usize, node_type: usize) -> Result<&ManyToMany> {
        self.check_type(elem_type)?;
        self.check_type(node_type)?;
        Ok(&self.cells[elem_type * self.types + node_type])
    }

    /// Bounds-checked mutable cell access.
    pub fn cell_mut(&mut self, elem_type: usize, node_type: usize) -> Result<&mut ManyToMany> {
        self.check_type(elem_type)?;
        self.check_type(node_type)?;
        Ok(&mut self.cells[elem_type * self.types + node_type])
    }

    /// Every `(elem_type, elem)` of a different type whose row in cell
    /// `(elem_type, node_type)` contains `node`, sorted.
    pub fn all_elements_of(&self, node_type: usize, node: usize) -> Result<Vec<TypedPair>> {
        self.check_type(node_type)?;
        let mut out = Vec::new();
        for elem_type in 0..self.types {
            if elem_type == node_type {
                continue;
            }
            let cell = &self.cells[elem_type * self.types + node_type];
            for elem in cell.elements_from_node(node) {
                out.push((elem_type, elem));
            }
        }
        sorted::sort_unique(&mut out);
        Ok(out)
    }

    /// Every `(node_type, node)` the element references across all
    /// node types, sorted.
    pub fn all_nodes_of(&self, elem_type: usize, elem: usize) -> Result<Vec<TypedPair>> {
        self.check_type(elem_type)?;
        let mut out = Vec::new();
        for node_type in 0..self.types {
            let cell = &self.cells[elem_type * self.types + node_type];
            if let Ok(row) = cell.row(elem) {
                for &node in row {
                    out.push((node_type, node));
                }
            }
        }
        sorted::sort_unique(&mut out);
        Ok(out)
    }

    /// Every `(elem_type, elem)` referencing any node of `node_type`,
    /// sorted.
    pub fn all_elements(&self, node_type: usize) -> Result<Vec<TypedPair>> {
        self.check_type(node_type)?;
        let mut out = Vec::new();
        for elem_type in 0..self.types {
            if elem_type == node_type {
                continue;
            }
            let cell = &self.cells[elem_type * self.types + node_type];
            for (elem, row) in cell.forward().rows().iter().enumerate() {
                if !row.is_empty() {
                    out.push((elem_type, elem));
                }
            }
        }
        sorted::sort_unique(&mut out);
        Ok(out)
    }

    /// Every `(node_type, node)` referenced by any element of
    /// `elem_type`, sorted.
    pub fn all_nodes(&self, elem_type: usize) -> Result<Vec<TypedPair>> {
        self.check_type(elem_type)?;
        let mut out = Vec::new();
        for node_type in 0..self.types {
            let cell = &self.cells[elem_type * self.types + node_type];
            for row in cell.forward().rows() {
                for &node in row {
                    out.push((node_type, node));
                }
            }
        }
        sorted::sort_unique(&mut out);
        Ok(out)
    }

    /// Number of entities of a type: the diagonal cell's element count.
    pub fn element_count(&self, elem_type: usize) -> Result<usize> {
        self.check_type(elem_type)?;
        Ok(self.cells[elem_type * self.types + elem_type].count())
    }

    /// Diagonal rows whose leading entry is currently marked for
    /// erasure.
    pub fn active_element_count(&self, elem_type: usize) -> Result<usize> {
        self.check_type(elem_type)?;
        let diagonal = &self.cells[elem_type * self.types + elem_type];
        let marked = &self.marked[elem_type];
        Ok(diagonal
            .forward()
            .rows()
            .iter()
            .filter(|row| row.first().is_some_and(|n| marked.contains(n)))
            .count())
    }

    /// Directed graph over types: edge `e → n` iff cell `(e, n)` is
    /// non-empty and `e ≠ n`.
    pub fn type_graph(&self) -> OneToMany {
        let mut graph = OneToMany::with_capacity(self.types);
        for elem_type in 0..self.types {
            let mut row = Vec::new();
            for node_type in 0..self.types {
                if elem_type != node_type
                    && self.cells[elem_type * self.types + node_type].count() > 0
                {
                    row.push(node_type);
                }
            }
            graph.append_element(row);
        }
        graph
    }

    /// Whether the cross-type dependency graph is a DAG.
    pub fn types_acyclic(&self) -> bool {
        self.type_graph().is_acyclic()
    }

    /// Topological order of the type graph; the identity order when no
    /// cross-type relation exists.
    pub fn type_top_order(&self) -> Vec<usize> {
        let graph = self.type_graph();
        if graph.entry_count() == 0 {
            (0..self.types).collect()
        } else {
            graph.top_order()
        }
    }

    /// Ids currently marked for erasure within a type.
    pub fn marked(&self, elem_type: usize) -> Result<&BTreeSet<usize>> {
        self.check_type(elem_type)?;
        Ok(&self.marked[elem_type])
    }

    /// Mark `(node_type, node)` for erasure, then transitively mark
    /// every element of any type that references something already
    /// marked. The walk is an explicit stack with the marked sets as
    /// the visited set, so it terminates in linear work.
    pub fn mark_to_erase(&mut self, node_type: usize, node: usize) -> Result<()> {
        self.check_type(node_type)?;
        if !self.marked[node_type].insert(node) {
            return Ok(());
        }
        let mut stack = vec![(node_type, node)];
        while let Some((current_type, current)) = stack.pop() {
            for (elem_type, elem) in self.all_elements_of(current_type, current)? {
                if self.marked[elem_type].insert(elem) {
                    stack.push((elem_type, elem));
                }
            }
        }
        debug!(
            node_type,
            node,
            total_marked = self.marked.iter().map(BTreeSet::len).sum::<usize>(),
            "cascade marking finished"
        );
        Ok(())
    }

    /// Old-id domain of a type: everywhere ids of that type can appear.
    fn id_domain(&self, t: usize) -> usize {
        let mut domain = 0;
        for j in 0..self.types {
            domain = domain.max(self.cells[t * self.types + j].count());
        }
        for i in 0..self.types {
            domain = domain.max(self.cells[i * self.types + t].node_space());
        }
        domain
    }

    /// Erase every marked id: renumber all survivors densely and rewrite
    /// every cell so both its element axis and node axis use the new
    /// ids. Clears the kill lists.
    pub fn compress(&mut self) {
        let maps: Vec<SurvivorMaps> = (0..self.types)
            .map(|t| survivor_maps(self.id_domain(t), &self.marked[t]))
            .collect();
        for elem_type in 0..self.types {
            for node_type in 0..self.types {
                self.cells[elem_type * self.types + node_type].rearrange(
                    &maps[elem_type].new_to_old,
                    &maps[node_type].old_to_new,
                );
            }
        }
        debug!(
            erased = self.marked.iter().map(BTreeSet::len).sum::<usize>(),
            "grid compression finished"
        );
        for kill in &mut self.marked {
            kill.clear();
        }
    }
}

impl Index<(usize, usize)> for TypedMatrix {
    type Output = ManyToMany;

    fn index(&self, (elem_type, node_type): (usize, usize)) -> &ManyToMany {
        assert!(elem_type < self.types && node_type < self.types);
        &self.cells[elem_type * self.types + node_type]
    }
}

impl IndexMut<(usize, usize)> for TypedMatrix {
    fn index_mut(&mut self, (elem_type, node_type): (usize, usize)) -> &mut ManyToMany {
        assert!(elem_type < self.types && node_type < self.types);
        &mut self.cells[elem_type * self.types + node_type]
    }
}

impl fmt::Display for TypedMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "typed matrix ({0}×{0} types)", self.types)?;
        for elem_type in 0..self.types {
            write!(f, "  type {elem_type}:")?;
            for node_type in 0..self.types {
                let cell = &self.cells[elem_type * self.types + node_type];
                write!(
                    f,
                    " ({},{})={}x{}",
                    elem_type,
                    node_type,
                    cell.count(),
                    cell.forward().entry_count()
                )?;
            }
            writeln!(f, " marked={}", self.marked[elem_type].len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two types: type-0 elements made of type-1 nodes, both diagonals
    /// carrying canonical self-lists.
    fn two_type_fixture() -> TypedMatrix {
        let mut matrix = TypedMatrix::new(2).unwrap();
        matrix[(0, 0)].append_elements(vec![vec![0], vec![1]]);
        matrix[(1, 1)].append_elements(vec![vec![0], vec![1], vec![2]]);
        matrix[(0, 1)].append_elements(vec![vec![0, 1], vec![1, 2]]);
        matrix
    }

    #[test]
    fn test_construction_requires_types() {
        assert!(TypedMatrix::new(0).is_err());
        assert_eq!(TypedMatrix::new(3).unwrap().types(), 3);
    }

    #[test]
    fn test_type_validation() {
        let matrix = two_type_fixture();
        assert!(matrix.cell(2, 0).is_err());
        assert!(matrix.all_elements_of(5, 0).is_err());
    }

    #[test]
    fn test_cross_type_queries() {
        let matrix = two_type_fixture();
        assert_eq!(
            matrix.all_elements_of(1, 1).unwrap(),
            vec![(0, 0), (0, 1)]
        );
        assert_eq!(
            matrix.all_nodes_of(0, 0).unwrap(),
            vec![(0, 0), (1, 0), (1, 1)]
        );
        assert_eq!(
            matrix.all_elements(1).unwrap(),
            vec![(0, 0), (0, 1)]
        );
        assert_eq!(matrix.element_count(1).unwrap(), 3);
    }

    #[test]
    fn test_type_graph_analysis() {
        let matrix = two_type_fixture();
        let graph = matrix.type_graph();
        assert_eq!(graph.rows()[0], vec![1]);
        assert!(matrix.types_acyclic());
        assert_eq!(matrix.type_top_order(), vec![0, 1]);

        let empty = TypedMatrix::new(3).unwrap();
        assert_eq!(empty.type_top_order(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cascading_delete_scenario() {
        let mut matrix = two_type_fixture();
        matrix.mark_to_erase(1, 1).unwrap();
        assert_eq!(
            matrix.marked(0).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(
            matrix.marked(1).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![1]
        );

        matrix.compress();
        assert_eq!(matrix[(0, 1)].count(), 0);
        assert_eq!(matrix[(0, 0)].count(), 0);
        // type-1 survivors 0 and 2 renumber to 0 and 1
        assert_eq!(matrix[(1, 1)].count(), 2);
        assert_eq!(matrix[(1, 1)].forward().rows(), &[vec![0], vec![1]]);
        assert!(matrix.marked(0).unwrap().is_empty());
        assert!(matrix.marked(1).unwrap().is_empty());
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut matrix = two_type_fixture();
        matrix.mark_to_erase(1, 2).unwrap();
        matrix.mark_to_erase(1, 2).unwrap();
        assert_eq!(matrix.marked(1).unwrap().len(), 1);
        // element 1 references node 2
        assert_eq!(matrix.marked(0).unwrap().len(), 1);
    }

    #[test]
    fn test_active_element_count_counts_marked_leads() {
        let mut matrix = two_type_fixture();
        assert_eq!(matrix.active_element_count(1).unwrap(), 0);
        matrix.mark_to_erase(1, 1).unwrap();
        // diagonal rows [0], [1], [2]: one leads with a marked id
        assert_eq!(matrix.active_element_count(1).unwrap(), 1);
    }
}
