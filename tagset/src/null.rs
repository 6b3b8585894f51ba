// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tagset_ident::{Ident, IdentFoundry};

use crate::seen::SeenTracker;
use crate::tagset::{TagSet, AVG_TAG_SIZE};
use crate::TagSetFoundry;

/// The simplest possible tag-set foundry: it builds tag-sets as requested
/// and caches nothing. This is the reference behavior, and the fastest
/// choice when inputs are mostly unique.
#[derive(Debug, Default)]
pub struct NullFoundry;

impl NullFoundry {
    pub fn new() -> NullFoundry {
        NullFoundry
    }
}

/// Appends a tag to a serialization under construction, separating it
/// from any previous tag with a comma. Tracks emptiness explicitly
/// because an empty tag is legal and contributes no bytes of its own.
#[inline]
fn append_tag(serialization: &mut Vec<u8>, any_appended: &mut bool, bytes: &[u8]) {
    if *any_appended {
        serialization.push(b',');
    }
    *any_appended = true;
    serialization.extend_from_slice(bytes);
}

impl TagSetFoundry for NullFoundry {
    fn new_with_duplicates(&mut self, idents: &[Ident]) -> Arc<TagSet> {
        let mut seen = SeenTracker::new();
        let mut hash_h = 0u64;
        let mut hash_l = 0u64;
        let mut serialization = Vec::with_capacity(idents.len() * AVG_TAG_SIZE);
        let mut any_appended = false;
        let mut nondup = Vec::with_capacity(idents.len());

        for ident in idents {
            let (hh, hl) = ident.hash();
            if seen.seen(hh, hl) {
                continue;
            }
            nondup.push(ident.clone());
            append_tag(&mut serialization, &mut any_appended, ident.bytes());
            hash_h ^= hh;
            hash_l ^= hl;
        }

        Arc::new(TagSet::build(
            nondup,
            [None, None],
            hash_h,
            hash_l,
            serialization,
        ))
    }

    fn new_without_duplicates(&mut self, idents: Vec<Ident>) -> Arc<TagSet> {
        let mut hash_h = 0u64;
        let mut hash_l = 0u64;
        let mut serialization = Vec::with_capacity(idents.len() * AVG_TAG_SIZE);
        let mut any_appended = false;

        for ident in &idents {
            append_tag(&mut serialization, &mut any_appended, ident.bytes());
            hash_h ^= ident.hash_h();
            hash_l ^= ident.hash_l();
        }

        Arc::new(TagSet::build(
            idents,
            [None, None],
            hash_h,
            hash_l,
            serialization,
        ))
    }

    fn parse(&mut self, idents: &mut dyn IdentFoundry, raw: &[u8]) -> Arc<TagSet> {
        if raw.is_empty() {
            return TagSet::empty();
        }

        let count = raw.iter().filter(|&&byte| byte == b',').count() + 1;
        let mut parsed = Vec::with_capacity(count);
        for token in raw.split(|&byte| byte == b',') {
            parsed.push(idents.ident(token));
        }

        // assume the caller may legitimately have repeated tags
        self.new_with_duplicates(&parsed)
    }

    fn union(&mut self, ts1: &Arc<TagSet>, ts2: &Arc<TagSet>) -> Arc<TagSet> {
        // keep the larger operand whole as a parent, and deduplicate the
        // smaller operand against it
        let (larger, smaller) = if ts1.size() < ts2.size() {
            (ts2, ts1)
        } else {
            (ts1, ts2)
        };

        let mut novel = Vec::with_capacity(smaller.size());
        let mut hash_h = larger.hash_h();
        let mut hash_l = larger.hash_l();
        let mut serialization =
            Vec::with_capacity(larger.serialization().len() + smaller.size() * AVG_TAG_SIZE);
        serialization.extend_from_slice(larger.serialization());
        let mut any_appended = !larger.is_empty();

        smaller.for_each(|ident| {
            if !larger.contains(ident) {
                novel.push(ident.clone());
                append_tag(&mut serialization, &mut any_appended, ident.bytes());
                hash_h ^= ident.hash_h();
                hash_l ^= ident.hash_l();
            }
        });

        Arc::new(TagSet::build(
            novel,
            [Some(Arc::clone(larger)), None],
            hash_h,
            hash_l,
            serialization,
        ))
    }

    fn disjoint_union(&mut self, ts1: &Arc<TagSet>, ts2: &Arc<TagSet>) -> Arc<TagSet> {
        let mut serialization = Vec::with_capacity(
            ts1.serialization().len() + ts2.serialization().len() + 1,
        );
        serialization.extend_from_slice(ts1.serialization());
        if !ts1.is_empty() && !ts2.is_empty() {
            serialization.push(b',');
        }
        serialization.extend_from_slice(ts2.serialization());

        Arc::new(TagSet::build(
            Vec::new(),
            [Some(Arc::clone(ts1)), Some(Arc::clone(ts2))],
            ts1.hash_h() ^ ts2.hash_h(),
            ts1.hash_l() ^ ts2.hash_l(),
            serialization,
        ))
    }
}
