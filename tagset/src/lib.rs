// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Tag-sets: unordered, duplicate-free collections of tags with a stable,
//! order-independent 128-bit hash.
//!
//! A telemetry pipeline sees each observation arrive with a
//! comma-separated line of `key:value` tags identifying its context. This
//! crate parses such lines into immutable [`TagSet`] values whose hash is
//! the XOR of the constituent tag hashes, so that two lines naming the
//! same tags in any order (and with any repetition) resolve to the same
//! context identity.
//!
//! Tag-sets are built by foundries implementing [`TagSetFoundry`]:
//! [`NullFoundry`] constructs them from scratch on every call, while
//! [`InternFoundry`] additionally memoizes `parse` results by the hash of
//! the raw input line. Individual tags are interned through the foundries
//! of the [`tagset_ident`] crate.

pub mod line_source;

mod intern;
mod null;
mod seen;
mod tagset;
#[cfg(test)]
mod test_support;
mod two_choice;

use std::sync::Arc;

use tagset_ident::{Ident, IdentFoundry};

pub use crate::intern::InternFoundry;
pub use crate::null::NullFoundry;
pub use crate::tagset::TagSet;

/// A foundry produces tag-sets. Foundries are not threadsafe.
pub trait TagSetFoundry {
    /// Creates a tag-set from identifiers that may contain duplicates,
    /// detected by their 128-bit hashes. The slice is not retained, and
    /// the caller may reuse it after the call returns.
    fn new_with_duplicates(&mut self, idents: &[Ident]) -> Arc<TagSet>;

    /// Creates a tag-set from identifiers the caller asserts are free of
    /// duplicates. The vector is retained in the tag-set.
    ///
    /// The assertion is not verified; passing duplicates produces a
    /// tag-set with an inconsistent hash.
    fn new_without_duplicates(&mut self, idents: Vec<Ident>) -> Arc<TagSet>;

    /// Creates a tag-set from a buffer of comma-separated tags, interning
    /// each tag through the given identifier foundry. Duplicate tags are
    /// detected while parsing. The buffer is not retained, and the caller
    /// may reuse it after the call returns.
    fn parse(&mut self, idents: &mut dyn IdentFoundry, raw: &[u8]) -> Arc<TagSet>;

    /// Combines two tag-sets into one, handling any duplicates between
    /// them. This is much slower than [`disjoint_union`], so callers that
    /// can otherwise ensure disjointness should prefer that.
    ///
    /// [`disjoint_union`]: TagSetFoundry::disjoint_union
    fn union(&mut self, ts1: &Arc<TagSet>, ts2: &Arc<TagSet>) -> Arc<TagSet>;

    /// Combines two tag-sets the caller asserts share no tags in common.
    ///
    /// The assertion is not verified; passing overlapping tag-sets
    /// produces a tag-set with an inconsistent hash.
    fn disjoint_union(&mut self, ts1: &Arc<TagSet>, ts2: &Arc<TagSet>) -> Arc<TagSet>;
}
