// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::{Arc, OnceLock};

use tagset_ident::Ident;

/// A guess at average tag size, to eliminate a few unnecessary
/// reallocations of serializations.
pub(crate) const AVG_TAG_SIZE: usize = 16;

/// An immutable, duplicate-free, unordered set of tags.
///
/// A tag-set has a 128-bit hash, represented as two 64-bit halves,
/// defined as the XOR of the hashes of its constituent identifiers: the
/// hash is independent of tag order, and the hash of a disjoint union is
/// the XOR of the operand hashes. The likelihood of hash collisions is
/// considered low enough to ignore.
///
/// A tag-set also carries its serialization: the constituent tags joined
/// by single commas. The serialization's byte content (modulo token
/// order) is stable for the set's lifetime, but the order itself is not
/// part of the public contract.
///
/// Large sets are structurally shared: a union keeps its larger operand
/// whole as a parent and stores only the novel identifiers locally.
pub struct TagSet {
    /// Duplicate-free identifiers local to this set (not contained in any
    /// parent). Not necessarily sorted.
    idents: Vec<Ident>,

    /// Tag-sets disjoint from each other and from `idents`.
    parents: [Option<Arc<TagSet>>; 2],

    hash_h: u64,
    hash_l: u64,

    /// Number of distinct identifiers, including parents.
    size: usize,

    serialization: Vec<u8>,
}

impl TagSet {
    pub(crate) fn build(
        idents: Vec<Ident>,
        parents: [Option<Arc<TagSet>>; 2],
        hash_h: u64,
        hash_l: u64,
        serialization: Vec<u8>,
    ) -> TagSet {
        let size = idents.len()
            + parents
                .iter()
                .flatten()
                .map(|parent| parent.size())
                .sum::<usize>();
        TagSet {
            idents,
            parents,
            hash_h,
            hash_l,
            size,
            serialization,
        }
    }

    /// The shared empty tag-set: zero hash, empty serialization.
    pub fn empty() -> Arc<TagSet> {
        static EMPTY: OnceLock<Arc<TagSet>> = OnceLock::new();
        Arc::clone(EMPTY.get_or_init(|| {
            Arc::new(TagSet::build(Vec::new(), [None, None], 0, 0, Vec::new()))
        }))
    }

    /// The 128-bit hash of this tag-set, high word first.
    #[inline]
    pub fn hash(&self) -> (u64, u64) {
        (self.hash_h, self.hash_l)
    }

    /// The high half of this tag-set's hash.
    #[inline]
    pub fn hash_h(&self) -> u64 {
        self.hash_h
    }

    /// The low half of this tag-set's hash.
    #[inline]
    pub fn hash_l(&self) -> u64 {
        self.hash_l
    }

    /// The serialization of this tag-set. The returned slice must not be
    /// assumed to list tags in any particular order.
    #[inline]
    pub fn serialization(&self) -> &[u8] {
        &self.serialization
    }

    /// Number of distinct tags in this tag-set.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// True if this tag-set contains the given identifier.
    pub fn contains(&self, ident: &Ident) -> bool {
        if self.idents.iter().any(|existing| existing == ident) {
            return true;
        }
        self.parents
            .iter()
            .flatten()
            .any(|parent| parent.contains(ident))
    }

    /// Calls `f` once for each identifier in the tag-set.
    pub fn for_each<F: FnMut(&Ident)>(&self, mut f: F) {
        self.visit(&mut f);
    }

    fn visit<F: FnMut(&Ident)>(&self, f: &mut F) {
        for ident in &self.idents {
            f(ident);
        }
        for parent in self.parents.iter().flatten() {
            parent.visit(f);
        }
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSet")
            .field("serialization", &String::from_utf8_lossy(&self.serialization))
            .field("size", &self.size)
            .field("hash_h", &self.hash_h)
            .field("hash_l", &self.hash_l)
            .finish()
    }
}
