//! Node membership sets for deduplication during row merges.
//!
//! Small node domains get a flat bit array (one u64 word per 64 ids);
//! anything larger falls back to a hash set. The crossover is the
//! `bitset_domain_limit` tuning knob.

use crate::config;
use std::collections::HashSet;

/// Fixed-domain bit array.
///
/// Words are allocated up front for the whole domain, so `insert` and
/// `contains` are single word operations.
#[derive(Clone, Debug)]
pub(crate) struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    pub(crate) fn with_domain(domain: usize) -> Self {
        BitSet {
            words: vec![0u64; domain.div_ceil(64)],
        }
    }

    /// Insert `value`; returns false if it was already present.
    pub(crate) fn insert(&mut self, value: usize) -> bool {
        let (word, bit) = (value / 64, value % 64);
        let mask = 1u64 << bit;
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    pub(crate) fn contains(&self, value: usize) -> bool {
        let (word, bit) = (value / 64, value % 64);
        self.words
            .get(word)
            .is_some_and(|w| w & (1u64 << bit) != 0)
    }

    pub(crate) fn clear(&mut self) {
        self.words.fill(0);
    }
}

/// Membership set with a small-domain bitset fast path.
pub(crate) enum NodeSet {
    Bits(BitSet),
    Hashed(HashSet<usize>),
}

impl NodeSet {
    /// Pick a backend for a node domain of the given size. Every value
    /// inserted later must be below `domain`.
    pub(crate) fn with_domain(domain: usize) -> Self {
        if domain <= config::bitset_domain_limit() {
            NodeSet::Bits(BitSet::with_domain(domain))
        } else {
            NodeSet::Hashed(HashSet::with_capacity(domain.min(1 << 16)))
        }
    }

    /// Insert `value`; returns false if it was already present.
    pub(crate) fn insert(&mut self, value: usize) -> bool {
        match self {
            NodeSet::Bits(bits) => bits.insert(value),
            NodeSet::Hashed(set) => set.insert(value),
        }
    }

    pub(crate) fn contains(&self, value: usize) -> bool {
        match self {
            NodeSet::Bits(bits) => bits.contains(value),
            NodeSet::Hashed(set) => set.contains(&value),
        }
    }

    pub(crate) fn clear(&mut self) {
        match self {
            NodeSet::Bits(bits) => bits.clear(),
            NodeSet::Hashed(set) => set.clear(),
        }
    }
}
