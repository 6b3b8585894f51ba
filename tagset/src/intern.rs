// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tagset_ident::hash::hash128;
use tagset_ident::{Ident, IdentFoundry};
use tracing::trace;

use crate::null::NullFoundry;
use crate::tagset::TagSet;
use crate::two_choice::TwoChoice;
use crate::TagSetFoundry;

/// A foundry that memoizes the tag-sets produced by `parse`, returning
/// the cached tag-set when the same raw input is seen again.
///
/// Only `parse` is memoized; the other operations pass through to an
/// inner [`NullFoundry`] unchanged. The cache is keyed by the 128-bit
/// hash of the raw input buffer — notably not by the hash of the
/// resulting tag-set, since distinct inputs (different orderings,
/// repeated tags) can produce the same set.
///
/// Not threadsafe; must not be accessed concurrently.
#[derive(Debug)]
pub struct InternFoundry {
    /// Fallback for when no memoized tag-set is found.
    fallback: NullFoundry,

    /// Tag-sets indexed by the hash of their raw parse input.
    by_parse_hash: TwoChoice,

    parses: u64,
    parse_misses: u64,
}

impl Default for InternFoundry {
    fn default() -> Self {
        Self::new()
    }
}

impl InternFoundry {
    pub fn new() -> InternFoundry {
        InternFoundry {
            fallback: NullFoundry::new(),
            by_parse_hash: TwoChoice::new(),
            parses: 0,
            parse_misses: 0,
        }
    }

    /// Creates a foundry whose parse cache is sized for roughly
    /// `capacity` distinct input lines.
    pub fn with_capacity(capacity: usize) -> InternFoundry {
        InternFoundry {
            fallback: NullFoundry::new(),
            by_parse_hash: TwoChoice::with_capacity(capacity),
            parses: 0,
            parse_misses: 0,
        }
    }

    /// Total number of `parse` calls.
    pub fn parses(&self) -> u64 {
        self.parses
    }

    /// Number of `parse` calls that were not served from the cache.
    pub fn parse_misses(&self) -> u64 {
        self.parse_misses
    }
}

impl TagSetFoundry for InternFoundry {
    fn new_with_duplicates(&mut self, idents: &[Ident]) -> Arc<TagSet> {
        self.fallback.new_with_duplicates(idents)
    }

    fn new_without_duplicates(&mut self, idents: Vec<Ident>) -> Arc<TagSet> {
        self.fallback.new_without_duplicates(idents)
    }

    fn parse(&mut self, idents: &mut dyn IdentFoundry, raw: &[u8]) -> Arc<TagSet> {
        self.parses += 1;

        let (raw_hash_h, raw_hash_l) = hash128(raw);
        if let Some(existing) = self.by_parse_hash.get(raw_hash_h, raw_hash_l) {
            return Arc::clone(existing);
        }

        self.parse_misses += 1;
        trace!(
            parses = self.parses,
            parse_misses = self.parse_misses,
            "tag-set parse cache miss"
        );

        let fresh = self.fallback.parse(idents, raw);
        self.by_parse_hash
            .insert(raw_hash_h, raw_hash_l, Arc::clone(&fresh));
        fresh
    }

    fn union(&mut self, ts1: &Arc<TagSet>, ts2: &Arc<TagSet>) -> Arc<TagSet> {
        self.fallback.union(ts1, ts2)
    }

    fn disjoint_union(&mut self, ts1: &Arc<TagSet>, ts2: &Arc<TagSet>) -> Arc<TagSet> {
        self.fallback.disjoint_union(ts1, ts2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::hash_of;
    use tagset_ident as ident;
    use tagset_ident::IdentFoundry;

    #[test]
    fn parse_returns_the_cached_tagset() {
        let mut idents = ident::InternFoundry::new();
        let mut foundry = InternFoundry::new();

        let first = foundry.parse(&mut idents, b"env:prod,host:web-1");
        let second = foundry.parse(&mut idents, b"env:prod,host:web-1");
        let third = foundry.parse(&mut idents, b"env:prod,host:web-1");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(foundry.parses(), 3);
        assert_eq!(foundry.parse_misses(), 1);
    }

    #[test]
    fn distinct_inputs_are_cached_separately() {
        let mut idents = ident::InternFoundry::new();
        let mut foundry = InternFoundry::new();

        let ts1 = foundry.parse(&mut idents, b"a,b");
        let ts2 = foundry.parse(&mut idents, b"c,d");
        assert!(!Arc::ptr_eq(&ts1, &ts2));
        assert_eq!(foundry.parse_misses(), 2);

        // a reordered line is a distinct input, even though the resulting
        // set is identical
        let ts3 = foundry.parse(&mut idents, b"b,a");
        assert!(!Arc::ptr_eq(&ts1, &ts3));
        assert_eq!(ts1.hash(), ts3.hash());
        assert_eq!(foundry.parse_misses(), 3);
    }

    #[test]
    fn empty_line_is_cached_as_the_empty_set() {
        let mut idents = ident::InternFoundry::new();
        let mut foundry = InternFoundry::new();

        let first = foundry.parse(&mut idents, b"");
        let second = foundry.parse(&mut idents, b"");
        assert!(Arc::ptr_eq(&first, &TagSet::empty()));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(foundry.parses(), 2);
        assert_eq!(foundry.parse_misses(), 1);
    }

    #[test]
    fn non_parse_operations_pass_through() {
        let mut idents = ident::InternFoundry::new();
        let mut foundry = InternFoundry::new();

        let a = idents.ident(b"a");
        let b = idents.ident(b"b");
        let with_dupes = foundry.new_with_duplicates(&[a.clone(), b.clone(), a.clone()]);
        assert_eq!(with_dupes.hash(), hash_of(&["a", "b"]));

        let without_dupes = foundry.new_without_duplicates(vec![a, b]);
        assert_eq!(without_dupes.hash(), hash_of(&["a", "b"]));

        let ts1 = foundry.parse(&mut idents, b"a,b");
        let ts2 = foundry.parse(&mut idents, b"b,c");
        let union = foundry.union(&ts1, &ts2);
        assert_eq!(union.hash(), hash_of(&["a", "b", "c"]));

        let ts3 = foundry.parse(&mut idents, b"d");
        let disjoint = foundry.disjoint_union(&ts1, &ts3);
        assert_eq!(disjoint.hash(), hash_of(&["a", "b", "d"]));

        // none of the above touched the parse counters beyond the parses
        assert_eq!(foundry.parses(), 3);
        assert_eq!(foundry.parse_misses(), 3);
    }

    #[test]
    fn cached_tagsets_survive_foundry_reuse() {
        let mut idents = ident::InternFoundry::new();
        let mut foundry = InternFoundry::with_capacity(64);

        let lines: Vec<String> = (0..64).map(|i| format!("shard:{i},env:prod")).collect();
        let first_pass: Vec<Arc<TagSet>> = lines
            .iter()
            .map(|line| foundry.parse(&mut idents, line.as_bytes()))
            .collect();
        assert_eq!(foundry.parse_misses(), 64);

        for (line, expected) in lines.iter().zip(&first_pass) {
            let again = foundry.parse(&mut idents, line.as_bytes());
            assert!(Arc::ptr_eq(&again, expected));
        }
        assert_eq!(foundry.parses(), 128);
        assert_eq!(foundry.parse_misses(), 64);
    }
}
