// Shared helpers for integration tests.
#![allow(dead_code)]

use parking_lot::{Condvar, Mutex};
use std::time::Duration;

/// Latch released once `signal` has been called `count` times.
pub struct CountdownEvent {
    remaining: Mutex<usize>,
    released: Condvar,
}

impl CountdownEvent {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            released: Condvar::new(),
        }
    }

    pub fn signal(&self) {
        let mut remaining = self.remaining.lock();
        assert!(*remaining > 0, "CountdownEvent signalled too many times");
        *remaining -= 1;
        if *remaining == 0 {
            self.released.notify_all();
        }
    }

    pub fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.released.wait(&mut remaining);
        }
    }

    /// Returns whether the latch is released, waiting at most `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut remaining = self.remaining.lock();
        if *remaining > 0 && !timeout.is_zero() {
            let _ = self.released.wait_for(&mut remaining, timeout);
        }
        *remaining == 0
    }

    pub fn is_set(&self) -> bool {
        self.wait_timeout(Duration::ZERO)
    }
}

/// Route `tracing` output to the test harness; `RUST_LOG` selects levels.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic pseudo-random stream, seeded per thread.
pub fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s >> 16)
    })
}

/// Bijective scramble of `u32`, used to spread consecutive ids over buckets.
pub fn scramble(n: u32) -> u32 {
    n.wrapping_mul(0x9e37_79b9)
}
