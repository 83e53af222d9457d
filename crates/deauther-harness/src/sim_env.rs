//! Simulated environment.
//!
//! Delegates to tokio timers so tests on a paused runtime advance virtual
//! time instantly, and records every requested delay so timing properties
//! (for example "fast mode never sleeps") can be asserted directly.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use deauther_core::Environment;

/// Recording environment for simulation tests.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl SimEnv {
    /// Create an environment with an empty sleep log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested delay, in request order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of sleeps requested.
    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Sum of every requested delay.
    pub fn total_slept(&self) -> Duration {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).iter().sum()
    }
}

impl Environment for SimEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).push(duration);
        tokio::time::sleep(duration)
    }
}
