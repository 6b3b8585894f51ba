// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tagset_ident::hash::PrehashedMap;

use crate::tagset::TagSet;

/// The default mask keeps the full 64-bit slot space. Narrow it (for
/// example to `0xfff`) to force collisions in tests.
pub(crate) const DEFAULT_HASH_MASK: u64 = u64::MAX;

#[derive(Debug)]
struct Entry {
    /// Full 128-bit key of this entry. For the parse cache this is the
    /// hash of the raw input buffer, which is not the hash of the
    /// tag-set it holds.
    hash_h: u64,
    hash_l: u64,
    value: Arc<TagSet>,
}

impl Entry {
    #[inline]
    fn matches(&self, hash_h: u64, hash_l: u64) -> bool {
        self.hash_h == hash_h && self.hash_l == hash_l
    }
}

/// A map keyed by a 128-bit value represented as high and low halves.
///
/// Internally this uses 2-choice hashing over a slot-indexed map: a key's
/// candidate slots are its two halves, and each entry carries the full
/// key so that a probe can compare all 128 bits. When both choices are
/// taken by foreign keys, the entry chains openly upward from the first
/// choice. Unlike the identifier interner, nothing is ever displaced: a
/// stored tag-set can always be found again under exactly its key.
#[derive(Debug)]
pub(crate) struct TwoChoice {
    slots: PrehashedMap<Entry>,
    mask: u64,
}

impl TwoChoice {
    pub(crate) fn new() -> TwoChoice {
        TwoChoice::with_mask(DEFAULT_HASH_MASK)
    }

    /// Creates a table sized for roughly `capacity` entries. Each entry
    /// occupies one slot but probes two, so the map is sized double.
    pub(crate) fn with_capacity(capacity: usize) -> TwoChoice {
        TwoChoice {
            slots: PrehashedMap::with_capacity_and_hasher(capacity * 2, Default::default()),
            mask: DEFAULT_HASH_MASK,
        }
    }

    pub(crate) fn with_mask(mask: u64) -> TwoChoice {
        TwoChoice {
            slots: PrehashedMap::default(),
            mask,
        }
    }

    /// Looks up the tag-set stored under the given key, if any.
    ///
    /// # Panics
    ///
    /// Panics if a collision chain traverses the entire slot space, which
    /// would require on the order of 2^64 entries with the default mask.
    pub(crate) fn get(&self, hash_h: u64, hash_l: u64) -> Option<&Arc<TagSet>> {
        let hash_h = hash_h & self.mask;
        let hash_l = hash_l & self.mask;

        // first choice..
        let first = self.slots.get(&hash_h);
        if let Some(entry) = first {
            if entry.matches(hash_h, hash_l) {
                return Some(&entry.value);
            }
        }

        // second choice..
        if let Some(entry) = self.slots.get(&hash_l) {
            if entry.matches(hash_h, hash_l) {
                return Some(&entry.value);
            }
        }

        // the first choice held a foreign key, so the entry may have been
        // pushed into the chain above it
        if first.is_some() {
            let mut slot = hash_h;
            loop {
                slot = slot.wrapping_add(1) & self.mask;
                if slot == hash_h {
                    panic!("two-choice table full");
                }
                match self.slots.get(&slot) {
                    Some(entry) if entry.matches(hash_h, hash_l) => {
                        return Some(&entry.value);
                    }
                    Some(_) => continue,
                    // an empty slot terminates the chain
                    None => return None,
                }
            }
        }

        None
    }

    /// Stores a tag-set under the given key, replacing any value already
    /// present under exactly that key.
    ///
    /// # Panics
    ///
    /// Panics if the slot space is saturated; unreachable at realistic
    /// scale with the default mask.
    pub(crate) fn insert(&mut self, hash_h: u64, hash_l: u64, value: Arc<TagSet>) {
        let hash_h = hash_h & self.mask;
        let hash_l = hash_l & self.mask;

        // first choice..
        let vacant_or_same = match self.slots.get(&hash_h) {
            None => true,
            Some(entry) => entry.matches(hash_h, hash_l),
        };
        if vacant_or_same {
            self.slots.insert(hash_h, Entry { hash_h, hash_l, value });
            return;
        }

        // second choice..
        let vacant_or_same = match self.slots.get(&hash_l) {
            None => true,
            Some(entry) => entry.matches(hash_h, hash_l),
        };
        if vacant_or_same {
            self.slots.insert(hash_l, Entry { hash_h, hash_l, value });
            return;
        }

        // open chaining from the first choice
        let mut slot = hash_h;
        loop {
            slot = slot.wrapping_add(1) & self.mask;
            if slot == hash_h {
                panic!("two-choice table full");
            }
            let vacant_or_same = match self.slots.get(&slot) {
                None => true,
                Some(entry) => entry.matches(hash_h, hash_l),
            };
            if vacant_or_same {
                self.slots.insert(slot, Entry { hash_h, hash_l, value });
                return;
            }
        }
    }
}
