// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Helpers shared by this crate's tests.

use tagset_ident::hash::hash128;

/// XOR of the 128-bit hashes of the given tags, high word first.
pub(crate) fn hash_of(tags: &[&str]) -> (u64, u64) {
    let mut hash_h = 0u64;
    let mut hash_l = 0u64;
    for tag in tags {
        let (h, l) = hash128(tag.as_bytes());
        hash_h ^= h;
        hash_l ^= l;
    }
    (hash_h, hash_l)
}

/// Splits a serialization into its comma-separated tokens. The empty
/// serialization belongs to the empty tag-set and yields no tokens.
pub(crate) fn parse_tokens(serialization: &[u8]) -> Vec<Vec<u8>> {
    if serialization.is_empty() {
        return Vec::new();
    }
    serialization
        .split(|&byte| byte == b',')
        .map(|token| token.to_vec())
        .collect()
}
