//! Environment abstraction for deterministic testing.
//!
//! Decouples the interaction engine from wall-clock time. Production uses
//! [`SystemEnv`] (tokio timers); the simulation harness substitutes an
//! environment that records every requested delay so timing properties can be
//! asserted on paused, virtual time.

use std::time::Duration;

/// Abstract environment providing time and async sleeping.
///
/// # Invariants
///
/// - `now()` never goes backwards
/// - `sleep()` completes no earlier than `duration` after it is first polled
pub trait Environment: Clone + Send + Sync + 'static {
    /// Instant type used by this environment.
    ///
    /// Production uses `tokio::time::Instant`, which follows the paused
    /// clock in tests.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// This is the ONLY async method in the trait. Engine code never calls it
    /// with a zero duration in fast mode; it simply does not suspend.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production environment backed by tokio timers.
#[derive(Clone, Debug, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn system_env_sleep_advances_clock() {
        let env = SystemEnv::new();

        let start = env.now();
        env.sleep(Duration::from_millis(50)).await;
        let elapsed = env.now() - start;

        assert!(elapsed >= Duration::from_millis(50), "Sleep should wait at least 50ms");
    }

    #[tokio::test(start_paused = true)]
    async fn system_env_time_is_monotonic() {
        let env = SystemEnv::new();

        let t1 = env.now();
        env.sleep(Duration::from_millis(1)).await;
        let t2 = env.now();

        assert!(t2 >= t1);
    }
}
