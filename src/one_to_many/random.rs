//! Random relation generation for tests and benchmarks.

use super::OneToMany;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build a relation by independent Bernoulli trials: each of the
/// `elements × nodes` pairs is present with probability `density`
/// (clamped to `[0, 1]`). A seed makes the result reproducible.
pub fn random_o2m(elements: usize, nodes: usize, density: f64, seed: Option<u64>) -> OneToMany {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let p = if density.is_nan() {
        0.0
    } else {
        density.clamp(0.0, 1.0)
    };
    let mut rows = Vec::with_capacity(elements);
    for _ in 0..elements {
        let mut row = Vec::new();
        for n in 0..nodes {
            if rng.gen_bool(p) {
                row.push(n);
            }
        }
        rows.push(row);
    }
    OneToMany::from_rows(rows)
}
