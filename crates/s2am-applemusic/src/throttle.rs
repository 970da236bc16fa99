// SPDX-License-Identifier: GPL-3.0-or-later

use tokio::time::{sleep, Duration};

/// Fixed-delay throttle shared by every catalog client.
///
/// Apple Music rate limits aggressive clients, so the converter waits the
/// configured delay before each outbound request. There is no adaptive
/// backoff: the delay is the only form of flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Throttle with the default 0.5 second delay.
    pub fn apple_music_default() -> Self {
        Self::new(Duration::from_millis(500))
    }

    /// No delay; used by tests.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait before issuing a request.
    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::trace!(target: "applemusic", "throttling: waiting {:?}", self.delay);
        sleep(self.delay).await;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::apple_music_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_throttle_waits_before_every_request() {
        let throttle = Throttle::new(Duration::from_millis(50));
        let start = Instant::now();

        for _ in 0..3 {
            throttle.wait().await;
        }

        // Unlike a minimum-interval limiter, the first request also waits.
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(150),
            "expected >= 150ms, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_disabled_throttle_is_immediate() {
        let throttle = Throttle::disabled();
        let start = Instant::now();
        throttle.wait().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }
}
