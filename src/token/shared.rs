//! Thread-safe handle around a token generator

use super::generator::SafeTokenGenerator;
use crate::error::Result;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// Cloneable, lock-protected generator for use from several threads
///
/// Every call takes the lock for its whole duration, so draws from
/// different threads never interleave inside one token.
pub struct SharedGenerator<R = StdRng> {
    inner: Arc<Mutex<SafeTokenGenerator<R>>>,
}

impl<R> Clone for SharedGenerator<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Rng> SharedGenerator<R> {
    pub fn new(generator: SafeTokenGenerator<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(generator)),
        }
    }

    /// Generate a token (thread-safe)
    pub fn generate(&self, length: usize) -> Result<String> {
        self.inner.lock().generate(length)
    }

    /// Check a string against the blocklist (thread-safe)
    pub fn contains_blocked_word(&self, candidate: &str) -> bool {
        self.inner.lock().contains_blocked_word(candidate)
    }
}

impl<R: Rng> From<SafeTokenGenerator<R>> for SharedGenerator<R> {
    fn from(generator: SafeTokenGenerator<R>) -> Self {
        Self::new(generator)
    }
}
