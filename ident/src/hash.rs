// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Hashing primitives shared by the identifier and tag-set layers.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

use xxhash_rust::xxh3::xxh3_128;

/// Hashes a byte slice to the 128-bit value used throughout the library,
/// returned as the high and low 64-bit halves.
///
/// XXH3-128 is deterministic, fast, and well dispersed; it is not
/// cryptographically collision-resistant, which is an accepted trade-off
/// for telemetry workloads.
#[inline]
#[must_use]
pub fn hash128(bytes: &[u8]) -> (u64, u64) {
    let hash = xxh3_128(bytes);
    ((hash >> 64) as u64, hash as u64)
}

/// A hasher for keys that are already well-dispersed 64-bit hash halves.
///
/// Slot-keyed maps in this library are indexed by one half of a 128-bit
/// hash; feeding that through a general-purpose hasher again would be
/// wasted work on the hot path, so this hasher passes the key through
/// unchanged.
pub struct NoopU64Hasher(u64);

impl Hasher for NoopU64Hasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, _bytes: &[u8]) {
        panic!("NoopU64Hasher only supports u64 keys");
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }
}

/// Builds [`NoopU64Hasher`] instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopU64HashBuilder;

impl BuildHasher for NoopU64HashBuilder {
    type Hasher = NoopU64Hasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        NoopU64Hasher(0)
    }
}

/// A map keyed by pre-hashed 64-bit values.
pub type PrehashedMap<V> = HashMap<u64, V, NoopU64HashBuilder>;
