//! TypedMatrix cross-type queries, type-DAG analysis and cascading
//! deletion.

use relmat::{RelationError, TypedMatrix};

/// Three types modelling a small mesh: faces (0) over edges (1) over
/// vertices (2); each diagonal carries the canonical self-list.
fn mesh_fixture() -> TypedMatrix {
    let mut m = TypedMatrix::new(3).unwrap();
    // vertices 0..4
    m[(2, 2)].append_elements((0..4).map(|v| vec![v]));
    // edges: 0=(0,1), 1=(1,2), 2=(2,3)
    m[(1, 1)].append_elements((0..3).map(|e| vec![e]));
    m[(1, 2)].append_elements(vec![vec![0, 1], vec![1, 2], vec![2, 3]]);
    // faces: 0=(edges 0,1), 1=(edges 1,2)
    m[(0, 0)].append_elements((0..2).map(|f| vec![f]));
    m[(0, 1)].append_elements(vec![vec![0, 1], vec![1, 2]]);
    m
}

// ============================================================================
// Validation and indexing
// ============================================================================

#[test]
fn test_construction() {
    assert_eq!(TypedMatrix::new(0).unwrap_err(), RelationError::EmptyTypeCount);
    let m = TypedMatrix::new(4).unwrap();
    assert_eq!(m.types(), 4);
    for i in 0..4 {
        for j in 0..4 {
            assert_eq!(m.cell(i, j).unwrap().count(), 0);
        }
    }
}

#[test]
fn test_type_bounds_are_checked_everywhere() {
    let m = mesh_fixture();
    assert!(m.cell(3, 0).is_err());
    assert!(m.all_elements_of(3, 0).is_err());
    assert!(m.all_nodes_of(0, 3).is_ok()); // the 3 here is an element id
    assert!(m.all_nodes_of(3, 0).is_err());
    assert!(m.element_count(3).is_err());
    assert!(m.marked(3).is_err());
}

#[test]
#[should_panic(expected = "assertion failed")]
fn test_index_panics_out_of_bounds() {
    let m = mesh_fixture();
    let _ = &m[(3, 0)];
}

// ============================================================================
// Cross-type queries
// ============================================================================

#[test]
fn test_all_elements_of_node() {
    let m = mesh_fixture();
    // edge 1 is used by both faces; vertex 1 by edges 0 and 1
    assert_eq!(m.all_elements_of(1, 1).unwrap(), vec![(0, 0), (0, 1)]);
    assert_eq!(m.all_elements_of(2, 1).unwrap(), vec![(1, 0), (1, 1)]);
    // vertices reference nothing
    assert!(m.all_elements_of(0, 0).unwrap().is_empty());
}

#[test]
fn test_all_nodes_of_element() {
    let m = mesh_fixture();
    assert_eq!(
        m.all_nodes_of(0, 0).unwrap(),
        vec![(0, 0), (1, 0), (1, 1)]
    );
    assert_eq!(
        m.all_nodes_of(1, 2).unwrap(),
        vec![(1, 2), (2, 2), (2, 3)]
    );
}

#[test]
fn test_axis_unions() {
    let m = mesh_fixture();
    assert_eq!(
        m.all_elements(2).unwrap(),
        vec![(1, 0), (1, 1), (1, 2)]
    );
    let nodes_of_faces = m.all_nodes(0).unwrap();
    assert_eq!(
        nodes_of_faces,
        vec![(0, 0), (0, 1), (1, 0), (1, 1), (1, 2)]
    );
}

#[test]
fn test_entity_counts() {
    let m = mesh_fixture();
    assert_eq!(m.element_count(0).unwrap(), 2);
    assert_eq!(m.element_count(1).unwrap(), 3);
    assert_eq!(m.element_count(2).unwrap(), 4);
}

// ============================================================================
// Type-DAG analysis
// ============================================================================

#[test]
fn test_type_graph_and_order() {
    let m = mesh_fixture();
    let graph = m.type_graph();
    assert_eq!(graph.rows()[0], vec![1]);
    assert_eq!(graph.rows()[1], vec![2]);
    assert_eq!(graph.rows()[2], vec![] as Vec<usize>);
    assert!(m.types_acyclic());
    assert_eq!(m.type_top_order(), vec![0, 1, 2]);
}

#[test]
fn test_type_top_order_identity_without_edges() {
    let m = TypedMatrix::new(4).unwrap();
    assert!(m.types_acyclic());
    assert_eq!(m.type_top_order(), vec![0, 1, 2, 3]);
}

#[test]
fn test_cyclic_types_detected() {
    let mut m = TypedMatrix::new(2).unwrap();
    m[(0, 1)].append_element(vec![0]);
    m[(1, 0)].append_element(vec![0]);
    assert!(!m.types_acyclic());
}

// ============================================================================
// Cascading deletion
// ============================================================================

#[test]
fn test_mark_cascades_transitively() {
    let mut m = mesh_fixture();
    // dooming vertex 1 takes edges 0 and 1, which takes both faces
    m.mark_to_erase(2, 1).unwrap();
    assert_eq!(
        m.marked(2).unwrap().iter().copied().collect::<Vec<_>>(),
        vec![1]
    );
    assert_eq!(
        m.marked(1).unwrap().iter().copied().collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(
        m.marked(0).unwrap().iter().copied().collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn test_compress_after_cascade() {
    let mut m = mesh_fixture();
    let vertices_before = m.element_count(2).unwrap();
    m.mark_to_erase(2, 1).unwrap();
    let killed_vertices = m.marked(2).unwrap().len();
    m.compress();

    // survivor counts per type
    assert_eq!(m.element_count(0).unwrap(), 0);
    assert_eq!(m.element_count(1).unwrap(), 1);
    assert_eq!(
        m.element_count(2).unwrap(),
        vertices_before - killed_vertices
    );

    // the surviving edge was (2, 3); vertices renumber 0,2,3 -> 0,1,2
    assert_eq!(m[(1, 2)].count(), 1);
    assert_eq!(m[(1, 2)].forward().rows(), &[vec![1, 2]]);

    // no dangling ids anywhere
    for i in 0..3 {
        for j in 0..3 {
            let cell = &m[(i, j)];
            let id_bound = m.element_count(j).unwrap();
            for row in cell.forward().rows() {
                for &node in row {
                    assert!(node < id_bound, "dangling id {node} in cell ({i},{j})");
                }
            }
        }
    }

    // kill lists are cleared
    for t in 0..3 {
        assert!(m.marked(t).unwrap().is_empty());
    }
}

#[test]
fn test_compress_preserves_survivor_order() {
    let mut m = TypedMatrix::new(2).unwrap();
    m[(1, 1)].append_elements((0..5).map(|v| vec![v]));
    m[(0, 1)].append_elements(vec![vec![0, 4], vec![2]]);
    m[(0, 0)].append_elements(vec![vec![0], vec![1]]);

    m.mark_to_erase(1, 2).unwrap();
    m.compress();

    // type-1 survivors 0,1,3,4 renumber to 0,1,2,3 in the same order
    assert_eq!(
        m[(1, 1)].forward().rows(),
        &[vec![0], vec![1], vec![2], vec![3]]
    );
    // the surviving type-0 element keeps its row, renumbered
    assert_eq!(m[(0, 1)].forward().rows(), &[vec![0, 3]]);
    assert_eq!(m[(0, 0)].forward().rows(), &[vec![0]]);
}

#[test]
fn test_active_element_count_tracks_marked() {
    let mut m = mesh_fixture();
    assert_eq!(m.active_element_count(1).unwrap(), 0);
    m.mark_to_erase(2, 0).unwrap(); // vertex 0 -> edge 0 -> face 0
    assert_eq!(m.active_element_count(2).unwrap(), 1);
    assert_eq!(m.active_element_count(1).unwrap(), 1);
    assert_eq!(m.active_element_count(0).unwrap(), 1);
}
