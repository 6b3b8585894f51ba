// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::hash::{hash128, PrehashedMap};
use crate::{Ident, IdentFoundry};

/// A foundry that caches identifiers forever, acting as a string interner.
///
/// The cache uses 2-choice hashing over a single slot-indexed map: an
/// identifier is stored under both its high and low hash halves, and a
/// lookup probes the two slots with a full 128-bit comparison at each.
/// On a slot collision during insertion the previous occupant is simply
/// overwritten, so interned data may transiently be duplicated — lookups
/// for the displaced identifier miss and re-intern it. The cache fails
/// safe: it can cause extra misses but never returns the wrong bytes.
///
/// The hash is not cryptographically collision-resistant, so an abusive
/// caller could force significant duplication. Callers of a telemetry
/// pipeline generally want it to perform well, so this is not treated as
/// an attack surface.
#[derive(Debug, Default)]
pub struct InternFoundry {
    by_hash: PrehashedMap<Ident>,
}

impl InternFoundry {
    pub fn new() -> InternFoundry {
        InternFoundry {
            by_hash: PrehashedMap::default(),
        }
    }

    /// Creates a foundry sized for roughly `capacity` distinct
    /// identifiers. Each identifier occupies two slots.
    pub fn with_capacity(capacity: usize) -> InternFoundry {
        InternFoundry {
            by_hash: PrehashedMap::with_capacity_and_hasher(capacity * 2, Default::default()),
        }
    }

    /// Looks up an interned identifier by its hash pair.
    pub(crate) fn get(&self, hash_h: u64, hash_l: u64) -> Option<&Ident> {
        if let Some(hit) = self.by_hash.get(&hash_h) {
            if hit.hash_h() == hash_h && hit.hash_l() == hash_l {
                return Some(hit);
            }
        }

        if let Some(hit) = self.by_hash.get(&hash_l) {
            if hit.hash_h() == hash_h && hit.hash_l() == hash_l {
                return Some(hit);
            }
        }

        None
    }

    /// Stores the identifier under both hash halves, displacing any
    /// previous occupants.
    pub(crate) fn insert(&mut self, hash_h: u64, hash_l: u64, ident: Ident) {
        self.by_hash.insert(hash_h, ident.clone());
        self.by_hash.insert(hash_l, ident);
    }
}

impl IdentFoundry for InternFoundry {
    fn ident(&mut self, bytes: &[u8]) -> Ident {
        let (hash_h, hash_l) = hash128(bytes);
        if let Some(existing) = self.get(hash_h, hash_l) {
            return existing.clone();
        }

        let fresh = Ident::new(bytes, hash_h, hash_l);
        self.insert(hash_h, hash_l, fresh.clone());
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_by_content() {
        let mut foundry = InternFoundry::new();

        let id1 = foundry.ident(b"aaa");
        let id2 = foundry.ident(b"aaa");
        let id3 = foundry.ident(b"bbb");

        assert!(id1.shares_storage(&id2));
        assert!(!id1.shares_storage(&id3));
        assert!(!id2.shares_storage(&id3));

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_ne!(id2, id3);

        assert_eq!(id1.hash(), id2.hash());
        assert_ne!(id1.hash(), id3.hash());
    }

    #[test]
    fn get_by_hash_pair() {
        let mut foundry = InternFoundry::new();
        let id1 = foundry.ident(b"aaa");

        let hit = foundry.get(id1.hash_h(), id1.hash_l()).cloned();
        assert!(hit.is_some_and(|hit| hit.shares_storage(&id1)));

        assert!(foundry.get(0x123, 0x456).is_none());
    }

    #[test]
    fn displacement_misses_but_never_lies() {
        let mut foundry = InternFoundry::new();

        // two forged identifiers sharing the high hash half
        let a = Ident::new(b"a", 1, 100);
        let b = Ident::new(b"b", 1, 200);

        foundry.insert(a.hash_h(), a.hash_l(), a.clone());
        // `b` overwrites slot 1, displacing `a` from its first choice
        foundry.insert(b.hash_h(), b.hash_l(), b.clone());

        // `a` survives in its second-choice slot
        let hit = foundry.get(1, 100).cloned();
        assert!(hit.is_some_and(|hit| hit.shares_storage(&a)));

        // displace `a` from its second choice too
        let c = Ident::new(b"c", 2, 100);
        foundry.insert(c.hash_h(), c.hash_l(), c.clone());

        // a full displacement is a miss, not a wrong answer
        assert!(foundry.get(1, 100).is_none());
        let hit = foundry.get(1, 200).cloned();
        assert!(hit.is_some_and(|hit| hit.shares_storage(&b)));
        let hit = foundry.get(2, 100).cloned();
        assert!(hit.is_some_and(|hit| hit.shares_storage(&c)));
    }
}
