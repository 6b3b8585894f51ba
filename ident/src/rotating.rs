// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;

use tracing::debug;

use crate::hash::hash128;
use crate::intern::InternFoundry;
use crate::{Ident, IdentFoundry};

/// A foundry holding several [`InternFoundry`] generations and rotating
/// through them, so that identifiers which are no longer requested are
/// eventually freed. The effect is similar to a batched least-recently-used
/// cache, without per-entry bookkeeping.
#[derive(Debug)]
pub struct RotatingFoundry {
    rotate_after: usize,
    count: usize,
    generations: VecDeque<InternFoundry>,
}

impl RotatingFoundry {
    /// Creates a foundry with `size` generations, rotating after every
    /// `rotate_after` calls to [`ident`](IdentFoundry::ident).
    ///
    /// `size` should typically be very small (single digits), as it bounds
    /// the probes needed to create a novel identifier. `rotate_after`
    /// should be tuned so that `rotate_after * (size - 1)` approximates
    /// the cardinality of the identifiers being created: for hostnames
    /// with around 10,000 hosts active at a time, `rotate_after = 5000`
    /// and `size = 3` are good choices.
    ///
    /// # Panics
    ///
    /// Panics if `size < 2` or `rotate_after < 1`.
    pub fn new(size: usize, rotate_after: usize) -> RotatingFoundry {
        assert!(size >= 2, "rotating foundry needs at least two generations");
        assert!(rotate_after >= 1, "rotation interval must be at least one call");

        let mut generations = VecDeque::with_capacity(size);
        for _ in 0..size {
            generations.push_back(InternFoundry::new());
        }

        RotatingFoundry {
            rotate_after,
            count: 0,
            generations,
        }
    }

    /// Starts a fresh generation, dropping the oldest.
    fn rotate(&mut self) {
        self.generations.pop_back();
        self.generations.push_front(InternFoundry::new());
        debug!(
            generations = self.generations.len(),
            rotate_after = self.rotate_after,
            "rotated identifier generations"
        );
    }
}

impl IdentFoundry for RotatingFoundry {
    fn ident(&mut self, bytes: &[u8]) -> Ident {
        self.count += 1;
        if self.count > self.rotate_after {
            self.rotate();
            self.count = 0;
        }

        let (hash_h, hash_l) = hash128(bytes);

        // search the generations for an interned identifier, promoting
        // deep hits into the current generation
        let mut hit = None;
        for (depth, generation) in self.generations.iter().enumerate() {
            if let Some(existing) = generation.get(hash_h, hash_l) {
                hit = Some((depth, existing.clone()));
                break;
            }
        }
        if let Some((depth, existing)) = hit {
            if depth > 0 {
                self.generations[0].insert(hash_h, hash_l, existing.clone());
            }
            return existing;
        }

        let fresh = Ident::new(bytes, hash_h, hash_l);
        self.generations[0].insert(hash_h, hash_l, fresh.clone());
        fresh
    }
}
