// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tagset_ident::hash::PrehashedMap;

/// Tracks 128-bit hashes that have been seen before.
///
/// The map buckets on the high half, with a linear scan for the low half
/// within the bucket. Almost every bucket holds a single entry, so the
/// scan is effectively constant-time.
#[derive(Debug, Default)]
pub(crate) struct SeenTracker {
    buckets: PrehashedMap<Vec<u64>>,
}

impl SeenTracker {
    pub(crate) fn new() -> SeenTracker {
        SeenTracker::default()
    }

    /// Records the given hash pair as seen, returning true if it had been
    /// seen before.
    pub(crate) fn seen(&mut self, hash_h: u64, hash_l: u64) -> bool {
        let bucket = self.buckets.entry(hash_h).or_default();
        if bucket.contains(&hash_l) {
            return true;
        }
        bucket.push(hash_l);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_repeats() {
        let mut tracker = SeenTracker::new();
        assert!(!tracker.seen(1, 2));
        assert!(tracker.seen(1, 2));
        assert!(tracker.seen(1, 2));
    }

    #[test]
    fn distinguishes_either_half() {
        let mut tracker = SeenTracker::new();
        assert!(!tracker.seen(1, 2));
        // same high half lands in the same bucket
        assert!(!tracker.seen(1, 3));
        // same low half lands in a different bucket
        assert!(!tracker.seen(4, 2));

        assert!(tracker.seen(1, 2));
        assert!(tracker.seen(1, 3));
        assert!(tracker.seen(4, 2));
    }
}
