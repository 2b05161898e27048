//! Display-tick scheduling.
//!
//! `TickScheduler` is a cancellable "repeat on next display tick" primitive:
//! it fires once per display refresh and skips missed ticks instead of
//! queueing them, so the render loop is never more than one tick ahead of
//! the display. The matching `CancelToken` is captured at setup and honored
//! by teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cancellation handle shared between the scheduler and whoever tears the
/// component down. Cancelling is one-way and idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel all pending and future ticks.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fires once per display refresh until its token is cancelled.
#[derive(Debug)]
pub struct TickScheduler {
    interval: tokio::time::Interval,
    token: CancelToken,
}

impl TickScheduler {
    /// Create a scheduler ticking at `refresh_hz` (clamped to at least 1).
    pub fn new(refresh_hz: u32) -> Self {
        let hz = refresh_hz.max(1);
        let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / hz as f64));
        // A slow tick must not cause a burst of catch-up ticks afterwards.
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        Self {
            interval,
            token: CancelToken::new(),
        }
    }

    /// The token honored by this scheduler. Clone it wherever teardown
    /// happens.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Wait for the next display tick.
    ///
    /// Returns `false` once the token has been cancelled; no further ticks
    /// fire after that.
    pub async fn next_tick(&mut self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.interval.tick().await;
        !self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_starts_live() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_shared_and_idempotent() {
        let token = CancelToken::new();
        let clone = token.clone();
        token.cancel();
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_ticks_fire_until_cancelled() {
        let mut scheduler = TickScheduler::new(1000);
        let token = scheduler.token();

        assert!(scheduler.next_tick().await);
        assert!(scheduler.next_tick().await);

        token.cancel();
        assert!(!scheduler.next_tick().await);
        assert!(!scheduler.next_tick().await);
    }

    #[tokio::test]
    async fn test_cancel_before_first_tick() {
        let mut scheduler = TickScheduler::new(60);
        scheduler.token().cancel();
        // Must return immediately without waiting out the interval
        assert!(!scheduler.next_tick().await);
    }

    #[tokio::test]
    async fn test_zero_hz_is_clamped() {
        // Construction must not panic on a zero refresh rate
        let mut scheduler = TickScheduler::new(0);
        assert!(scheduler.next_tick().await);
    }
}
