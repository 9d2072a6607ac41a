/*
[INPUT]:  Wall clock (milliseconds since epoch)
[OUTPUT]: Strictly increasing timestamp nonces
[POS]:    Signing layer - replay-safe nonce generation
[UPDATE]: When nonce format changes
*/

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Millisecond-timestamp nonces, strictly increasing per source
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in ms, bumped past the previously issued nonce if needed
    pub fn next(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut previous = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(previous.saturating_add(1));
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => previous = actual,
            }
        }
    }
}
