//! # Relmat
//!
//! Typed multi-relational sparse graphs: a family of element→node
//! adjacency containers and their matrix-algebra operations, built for
//! mesh/topology, combinatorial and relational-analytics workloads that
//! repeatedly query neighborhoods, compose relations, and perform
//! coordinated deletions across interacting relations.
//!
//! ## Layer Architecture
//!
//! ```text
//! OneToMany                 sparse element -> node adjacency
//!     ↓                     (algebra, transpose, ordering, CSR)
//! ManyToMany                + synchronized inverse view
//!     ↓                     (neighborhoods, cliques, position caches)
//! TypedMatrix               T×T grid of ManyToMany cells
//!                           (cross-type traversal, cascading deletion)
//! ```
//!
//! ## Usage
//!
//! ### Adjacency algebra
//! ```
//! use relmat::OneToMany;
//!
//! let a = OneToMany::from_rows(vec![vec![0, 2], vec![1], vec![0, 1, 2]]);
//! let t = a.transpose();
//! assert_eq!(t.rows(), &[vec![0, 2], vec![1, 2], vec![0, 2]]);
//!
//! let b = OneToMany::from_rows(vec![vec![2], vec![1]]);
//! let union = &a | &b;
//! assert_eq!(union.rows()[0], vec![0, 2]);
//! ```
//!
//! ### Synchronized inverse views
//! ```
//! use relmat::ManyToMany;
//!
//! let mut m2m = ManyToMany::new();
//! m2m.append_element(vec![0, 1]);
//! m2m.append_element(vec![1, 2]);
//! assert_eq!(m2m.elements_from_node(1), vec![0, 1]);
//! assert_eq!(m2m.node_neighbours(1), vec![0, 2]);
//! ```
//!
//! ### Cascading deletion across types
//! ```
//! use relmat::TypedMatrix;
//!
//! let mut matrix = TypedMatrix::new(2)?;
//! matrix[(0, 1)].append_element(vec![0, 1]);
//! matrix.mark_to_erase(1, 0)?;       // doom a type-1 node
//! matrix.compress();                 // its type-0 referrer goes too
//! assert_eq!(matrix[(0, 1)].count(), 0);
//! # Ok::<(), relmat::RelationError>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `one_to_many` | Core sparse adjacency and its algebra |
//! | `many_to_many` | Inverse-synchronized relation with neighborhood queries |
//! | `typed_matrix` | Cross-type grid with mark-and-sweep deletion |
//! | `sorted` | Ordered-set primitives over sorted sequences |
//! | `renumber` | Kill-list survivor maps |
//! | `config` | Tuning knobs (thread pool, parallel threshold) |
//! | `eps` | PostScript debug rendering |

pub mod config;
pub mod eps;
pub mod error;
pub mod many_to_many;
mod membership;
pub mod one_to_many;
pub mod renumber;
pub mod sorted;
pub mod typed_matrix;

pub use config::Config;
pub use error::{RelationError, Result};
pub use many_to_many::ManyToMany;
pub use one_to_many::{random_o2m, CsrMatrix, OneToMany, RelationStats};
pub use renumber::{survivor_maps, SurvivorMaps};
pub use typed_matrix::{TypedMatrix, TypedPair};
