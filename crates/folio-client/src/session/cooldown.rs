//! Refresh cool-down breaker.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// How long refresh attempts stay suppressed after a refresh failure.
pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

/// Suppresses session refreshes for a fixed window after one fails.
///
/// Shared by all clones of one client. While it is tripped, 401 responses are
/// surfaced as-is with no call to the refresh endpoint.
#[derive(Debug)]
pub struct RefreshCooldown {
    window: Duration,
    tripped_at: Mutex<Option<Instant>>,
}

impl Default for RefreshCooldown {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_COOLDOWN)
    }
}

impl RefreshCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            tripped_at: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// True while a recent refresh failure is suppressing new attempts.
    pub fn is_failed(&self) -> bool {
        let mut tripped_at = self.tripped_at.lock();
        match *tripped_at {
            Some(at) if at.elapsed() < self.window => true,
            Some(_) => {
                *tripped_at = None;
                false
            }
            None => false,
        }
    }

    /// Record a refresh failure, (re)starting the window.
    pub fn mark_failed(&self) {
        *self.tripped_at.lock() = Some(Instant::now());
    }

    /// Clear the breaker immediately.
    pub fn reset(&self) {
        *self.tripped_at.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        assert!(!RefreshCooldown::default().is_failed());
    }

    #[test]
    fn test_mark_and_reset() {
        let cooldown = RefreshCooldown::default();
        cooldown.mark_failed();
        assert!(cooldown.is_failed());
        cooldown.reset();
        assert!(!cooldown.is_failed());
    }

    #[test]
    fn test_window_expires() {
        let cooldown = RefreshCooldown::new(Duration::from_millis(20));
        cooldown.mark_failed();
        assert!(cooldown.is_failed());
        std::thread::sleep(Duration::from_millis(40));
        assert!(!cooldown.is_failed());
    }

    #[test]
    fn test_huge_window_stays_tripped() {
        let cooldown = RefreshCooldown::new(Duration::from_secs(u64::MAX));
        cooldown.mark_failed();
        assert!(cooldown.is_failed());
        cooldown.reset();
        assert!(!cooldown.is_failed());
    }

    #[test]
    fn test_mark_restarts_window() {
        let cooldown = RefreshCooldown::new(Duration::from_millis(60));
        cooldown.mark_failed();
        std::thread::sleep(Duration::from_millis(40));
        cooldown.mark_failed();
        std::thread::sleep(Duration::from_millis(40));
        assert!(cooldown.is_failed());
    }
}
