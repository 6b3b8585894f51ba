// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Storage and manipulation of tag identifiers.
//!
//! An [`Ident`] is an immutable handle to a single tag (for example
//! `env:prod`) carrying the tag's bytes and its 128-bit hash. Identifiers
//! are produced by foundries, which differ only in how long they retain
//! the storage backing the identifiers they hand out:
//!
//! - [`NullFoundry`] retains nothing and allocates per call.
//! - [`InternFoundry`] retains every identifier forever, deduplicating
//!   storage for repeated tags.
//! - [`RotatingFoundry`] retains identifiers for a bounded window of
//!   calls, giving a batched approximation of an LRU cache.
//! - [`ThreadsafeFoundry`] wraps any other foundry with a lock so that it
//!   can be shared across threads.
//!
//! Hash collisions between distinct tags are conflated silently; the
//! 128-bit hash is dispersed well enough that this is considered
//! negligible for non-adversarial workloads.

pub mod hash;

mod ident;
mod intern;
mod null;
mod rotating;
mod threadsafe;

pub use crate::ident::Ident;
pub use crate::intern::InternFoundry;
pub use crate::null::NullFoundry;
pub use crate::rotating::RotatingFoundry;
pub use crate::threadsafe::ThreadsafeFoundry;

/// A foundry produces identifiers.
///
/// Foundries are not threadsafe unless explicitly specified; see
/// [`ThreadsafeFoundry`] for sharing one across threads.
pub trait IdentFoundry {
    /// Returns an [`Ident`] for the given byte slice. The slice is not
    /// retained, and the caller may reuse its buffer after the call
    /// returns.
    fn ident(&mut self, bytes: &[u8]) -> Ident;
}
