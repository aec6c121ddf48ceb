//! Bounded readiness retry
//!
//! Animation assets may still be loading when a cell needs them. Callers ask
//! the policy what to do for a given attempt; the policy never blocks.

use serde::{Deserialize, Serialize};

/// Retry parameters for a readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total checks, including the first one
    pub max_attempts: u32,
    /// Fixed delay between checks (ms)
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 100,
        }
    }
}

/// What to do after a readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Resource is ready, use it now
    Ready,
    /// Check again after the given delay (ms)
    RetryAfter(u64),
    /// Out of attempts, fall back to the simpler presentation
    GiveUp,
}

impl RetryPolicy {
    /// Evaluate the predicate for a zero-based attempt number
    pub fn check(&self, attempt: u32, is_ready: impl FnOnce() -> bool) -> Readiness {
        if is_ready() {
            Readiness::Ready
        } else if attempt + 1 < self.max_attempts {
            Readiness::RetryAfter(self.backoff_ms)
        } else {
            Readiness::GiveUp
        }
    }
}
