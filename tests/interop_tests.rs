//! CSR, boolean-matrix and serde round-trip tests.

use relmat::{CsrMatrix, OneToMany};

#[test]
fn test_csr_round_trip_row_exact() {
    let a = OneToMany::from_rows(vec![vec![2, 0, 2], vec![], vec![5]]);
    let csr = a.to_csr();
    assert_eq!(csr.row_ptr, vec![0, 3, 3, 4]);
    assert_eq!(csr.col, vec![2, 0, 2, 5]);
    assert_eq!(OneToMany::from_csr(&csr).unwrap(), a);
}

#[test]
fn test_csr_of_empty_relation() {
    let empty = OneToMany::new();
    let csr = empty.to_csr();
    assert_eq!(csr.row_ptr, vec![0]);
    assert!(csr.col.is_empty());
    assert_eq!(OneToMany::from_csr(&csr).unwrap(), empty);
}

#[test]
fn test_csr_validation_errors() {
    assert!(CsrMatrix::default().validate().is_err());
    assert!(CsrMatrix {
        row_ptr: vec![1, 2],
        col: vec![0, 0]
    }
    .validate()
    .is_err());
    assert!(CsrMatrix {
        row_ptr: vec![0, 3],
        col: vec![0]
    }
    .validate()
    .is_err());
    assert!(CsrMatrix {
        row_ptr: vec![0, 2, 1, 3],
        col: vec![0, 0, 0]
    }
    .validate()
    .is_err());
    assert!(CsrMatrix {
        row_ptr: vec![0, 1, 3],
        col: vec![9, 8, 7]
    }
    .validate()
    .is_ok());
}

#[test]
fn test_boolean_matrix_round_trip() {
    let a = OneToMany::from_rows(vec![vec![3, 1], vec![], vec![0]]);
    let dense = a.to_boolean_matrix();
    assert_eq!(dense.len(), 3);
    assert_eq!(dense[0], vec![0, 1, 0, 1]);
    assert_eq!(dense[2], vec![1, 0, 0, 0]);

    let back = OneToMany::from_boolean_matrix(&dense);
    // rows come back ascending and deduplicated
    assert_eq!(back.rows(), &[vec![1, 3], vec![], vec![0]]);
}

#[test]
fn test_serde_json_round_trip() {
    let a = OneToMany::from_rows(vec![vec![1, 4], vec![0]]);
    let json = serde_json::to_string(&a).unwrap();
    let back: OneToMany = serde_json::from_str(&json).unwrap();
    assert_eq!(back, a);
    // the max-node cache is rebuilt, not serialized
    assert_eq!(back.max_node(), Some(4));

    let csr = a.to_csr();
    let json = serde_json::to_string(&csr).unwrap();
    let back: CsrMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, csr);
}
