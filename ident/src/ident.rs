// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A single tag, with its 128-bit hash.
///
/// Identifiers are immutable after creation and cheap to clone: the tag
/// bytes live in shared storage, so a clone copies two words and bumps a
/// reference count. Foundries that intern hand out clones backed by the
/// same storage, which makes equality of repeated tags a pointer
/// comparison.
///
/// The 128-bit hash is represented as two 64-bit halves (`hash_h` and
/// `hash_l`). The likelihood of hash collisions is considered low enough
/// to ignore.
#[derive(Clone)]
pub struct Ident {
    hash_h: u64,
    hash_l: u64,
    bytes: Arc<[u8]>,
}

impl Ident {
    /// Creates a new identifier carrying the given hash. The input slice
    /// is copied and no longer referenced after return. Typically
    /// identifiers are created via an [`IdentFoundry`](crate::IdentFoundry),
    /// not by this function.
    pub(crate) fn new(bytes: &[u8], hash_h: u64, hash_l: u64) -> Ident {
        Ident {
            hash_h,
            hash_l,
            bytes: Arc::from(bytes),
        }
    }

    /// The bytes defining the tag.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The 128-bit hash of the tag, high word first.
    #[inline]
    pub fn hash(&self) -> (u64, u64) {
        (self.hash_h, self.hash_l)
    }

    /// The high half of the tag's hash.
    #[inline]
    pub fn hash_h(&self) -> u64 {
        self.hash_h
    }

    /// The low half of the tag's hash.
    #[inline]
    pub fn hash_l(&self) -> u64 {
        self.hash_l
    }

    /// True if both identifiers are backed by the same storage, as clones
    /// of a single interned identifier are. Storage identity implies
    /// equality; the converse does not hold.
    #[inline]
    pub fn shares_storage(&self, other: &Ident) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

/// Approximate equality: storage-identical, or both hash halves equal.
/// This may have false positives (from 128-bit hash collisions) but not
/// false negatives.
impl PartialEq for Ident {
    fn eq(&self, other: &Ident) -> bool {
        self.shares_storage(other)
            || (self.hash_h == other.hash_h && self.hash_l == other.hash_l)
    }
}

impl Eq for Ident {}

/// Strict order on `(hash_h, hash_l)`.
impl Ord for Ident {
    fn cmp(&self, other: &Ident) -> Ordering {
        (self.hash_h, self.hash_l).cmp(&(other.hash_h, other.hash_l))
    }
}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Ident) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::hash::Hash for Ident {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_h);
        state.write_u64(self.hash_l);
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ident")
            .field("bytes", &String::from_utf8_lossy(&self.bytes))
            .field("hash_h", &self.hash_h)
            .field("hash_l", &self.hash_l)
            .finish()
    }
}
