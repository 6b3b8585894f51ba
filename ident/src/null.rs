// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::hash::hash128;
use crate::{Ident, IdentFoundry};

/// A foundry that simply creates a new identifier for each call.
///
/// Useful for tests and for effectively-unbounded-cardinality identifiers,
/// where each tag will only be seen once and interning would retain
/// storage for no benefit.
#[derive(Debug, Default)]
pub struct NullFoundry;

impl NullFoundry {
    pub fn new() -> NullFoundry {
        NullFoundry
    }
}

impl IdentFoundry for NullFoundry {
    fn ident(&mut self, bytes: &[u8]) -> Ident {
        let (hash_h, hash_l) = hash128(bytes);
        Ident::new(bytes, hash_h, hash_l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash128;

    #[test]
    fn allocates_fresh_storage_per_call() {
        let mut foundry = NullFoundry::new();
        let id1 = foundry.ident(b"aaa");
        let id2 = foundry.ident(b"aaa");

        assert!(!id1.shares_storage(&id2));
        assert_eq!(id1, id2);
        assert_eq!(id1.hash(), hash128(b"aaa"));
    }
}
