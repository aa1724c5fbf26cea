//! Kill-list renumbering maps.
//!
//! Given a dense id domain and a set of ids to delete, produce the two
//! maps a joint compression needs: `old_to_new` (with -1 for killed ids)
//! and `new_to_old` (ascending survivor enumeration). Consumed by
//! [`TypedMatrix::compress`](crate::TypedMatrix::compress).

use std::collections::BTreeSet;

/// Paired renumbering maps produced by [`survivor_maps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurvivorMaps {
    /// `old_to_new[i]` is the new id of survivor `i`, or -1 if killed.
    pub old_to_new: Vec<isize>,
    /// `new_to_old[k]` is the old id of the `k`-th survivor, ascending.
    pub new_to_old: Vec<usize>,
}

/// Enumerate the survivors of a dense id domain `[0, old_count)` after
/// deleting `kill`. Kill entries outside the domain are ignored.
pub fn survivor_maps(old_count: usize, kill: &BTreeSet<usize>) -> SurvivorMaps {
    let mut old_to_new = Vec::with_capacity(old_count);
    let mut new_to_old = Vec::with_capacity(old_count.saturating_sub(kill.len()));
    for old in 0..old_count {
        if kill.contains(&old) {
            old_to_new.push(-1);
        } else {
            old_to_new.push(new_to_old.len() as isize);
            new_to_old.push(old);
        }
    }
    SurvivorMaps {
        old_to_new,
        new_to_old,
    }
}
