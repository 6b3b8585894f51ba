// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex, PoisonError};

use crate::{Ident, IdentFoundry};

/// Wraps another foundry with a single exclusion lock, allowing concurrent
/// use from multiple threads. Clones share the wrapped foundry.
///
/// This is a low-contention baseline, not a lock-free interner: every
/// `ident` call takes the mutex.
#[derive(Debug)]
pub struct ThreadsafeFoundry<F> {
    inner: Arc<Mutex<F>>,
}

impl<F> Clone for ThreadsafeFoundry<F> {
    fn clone(&self) -> Self {
        ThreadsafeFoundry {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: IdentFoundry> ThreadsafeFoundry<F> {
    pub fn new(inner: F) -> ThreadsafeFoundry<F> {
        ThreadsafeFoundry {
            inner: Arc::new(Mutex::new(inner)),
        }
    }
}

impl<F: IdentFoundry> IdentFoundry for ThreadsafeFoundry<F> {
    fn ident(&mut self, bytes: &[u8]) -> Ident {
        // the wrapped foundry is left in a consistent state by every call,
        // so a panic on another thread cannot corrupt it; absorb poisoning
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .ident(bytes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::InternFoundry;

    #[test]
    fn delegates_to_inner_foundry() {
        let mut foundry = ThreadsafeFoundry::new(InternFoundry::new());
        let id1 = foundry.ident(b"env:prod");
        let id2 = foundry.ident(b"env:prod");
        assert!(id1.shares_storage(&id2));
    }

    #[test]
    fn clones_share_the_interner_across_threads() {
        let foundry = ThreadsafeFoundry::new(InternFoundry::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut foundry = foundry.clone();
                std::thread::spawn(move || foundry.ident(b"shard:7"))
            })
            .collect();

        let idents: Vec<Ident> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for pair in idents.windows(2) {
            assert!(pair[0].shares_storage(&pair[1]));
        }
    }
}
