//! Inverse relation, occurrence positions, and clique expansion.
//!
//! The transpose runs as three passes (count, allocate, fill). Above the
//! parallel threshold the fill pass is chunked over the forward scan;
//! each chunk collects `(node, element)` pairs independently and the
//! chunks are drained in element order, so target rows come out with
//! ascending element ids either way.

use super::{map_rows_indexed, OneToMany};
use crate::config;
use rayon::prelude::*;

impl OneToMany {
    /// Inverse relation: row `n` of the result lists every element whose
    /// row contains `n`, ascending. The result has
    /// `max(count, node_space)` rows so both id spaces survive a
    /// round-trip.
    pub fn transpose(&self) -> Self {
        let targets = self.count().max(self.node_space());

        let mut counts = vec![0usize; targets];
        for row in self.rows() {
            for &n in row {
                counts[n] += 1;
            }
        }

        let mut out: Vec<Vec<usize>> = counts.iter().map(|&c| Vec::with_capacity(c)).collect();

        let threshold = config::parallel_threshold();
        if self.count() >= threshold && threshold > 0 {
            let per_chunk: Vec<Vec<(usize, usize)>> = self
                .rows()
                .par_chunks(threshold)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    let base = chunk_index * threshold;
                    let mut pairs = Vec::with_capacity(chunk.iter().map(Vec::len).sum());
                    for (offset, row) in chunk.iter().enumerate() {
                        for &n in row {
                            pairs.push((n, base + offset));
                        }
                    }
                    pairs
                })
                .collect();
            for pairs in per_chunk {
                for (n, e) in pairs {
                    out[n].push(e);
                }
            }
        } else {
            for (e, row) in self.rows().iter().enumerate() {
                for &n in row {
                    out[n].push(e);
                }
            }
        }

        OneToMany::from_rows(out)
    }

    /// Clique expansion over a forward/inverse pair: for each element,
    /// map its nodes to compact ids (rank within the ascending
    /// enumeration of occupied nodes, read off the inverse) and emit the
    /// |nodes|² Cartesian (row, col) pairs flattened in row-major order.
    pub fn cliques_of(forward: &OneToMany, inverse: &OneToMany) -> OneToMany {
        let occupied: Vec<usize> = inverse
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_empty())
            .map(|(n, _)| n)
            .collect();

        let rows = map_rows_indexed(forward.rows(), |_, row| {
            let ids: Vec<usize> = row
                .iter()
                .map(|&n| occupied.binary_search(&n).unwrap_or(usize::MAX))
                .collect();
            let mut out = Vec::with_capacity(2 * ids.len() * ids.len());
            for &a in &ids {
                for &b in &ids {
                    out.push(a);
                    out.push(b);
                }
            }
            out
        });
        OneToMany::from_rows(rows)
    }
}

/// For each outer index `o` and offset `k`, the position at which `o`
/// first occurs inside `within[of[o][k]]`. Positions are meaningful only
/// when `within` is the transpose of `of` (or vice versa); a missing
/// occurrence yields `usize::MAX`.
pub(crate) fn occurrence_positions(of: &OneToMany, within: &OneToMany) -> Vec<Vec<usize>> {
    map_rows_indexed(of.rows(), |outer, row| {
        row.iter()
            .map(|&target| {
                within
                    .rows()
                    .get(target)
                    .and_then(|r| r.iter().position(|&x| x == outer))
                    .unwrap_or(usize::MAX)
            })
            .collect()
    })
}
