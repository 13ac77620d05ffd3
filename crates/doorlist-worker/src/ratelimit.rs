use std::collections::HashMap;
use std::sync::Mutex;

/// Caps for guest RSVP submission and confirmation, per source address.
pub const RSVP_LIMIT: u32 = 3;
pub const RSVP_WINDOW_SECS: i64 = 300;

/// Caps for admin login attempts, per source address.
pub const ADMIN_LOGIN_LIMIT: u32 = 5;
pub const ADMIN_LOGIN_WINDOW_SECS: i64 = 900;

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: i64,
    window_secs: i64,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited,
}

/// Fixed-window request caps keyed by caller-chosen strings (route class
/// plus source address).
///
/// One instance lives for the life of the isolate, owned by the request
/// layer and passed to handlers by reference. The window ledger is the only
/// cross-request in-memory state in the service.
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt for `key` and decide whether it fits the cap.
    ///
    /// The clock is injected: callers pass the current unix timestamp.
    pub fn check(&self, key: &str, limit: u32, window_secs: i64, now: i64) -> Decision {
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");

        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            window_secs,
            count: 0,
        });
        if now - window.started_at >= window_secs {
            window.started_at = now;
            window.count = 0;
        }
        window.window_secs = window_secs;
        window.count = window.count.saturating_add(1);

        if window.count > limit {
            Decision::Limited
        } else {
            Decision::Allowed
        }
    }

    /// Drop windows that have already ended, bounding the ledger's size.
    pub fn sweep(&self, now: i64) {
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");
        windows.retain(|_, w| now - w.started_at < w.window_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_cap_then_limits() {
        let limiter = FixedWindowLimiter::new();
        for _ in 0..3 {
            assert_eq!(limiter.check("k", 3, 300, 100), Decision::Allowed);
        }
        assert_eq!(limiter.check("k", 3, 300, 100), Decision::Limited);
        assert_eq!(limiter.check("k", 3, 300, 250), Decision::Limited);
    }

    #[test]
    fn window_resets_after_it_ends() {
        let limiter = FixedWindowLimiter::new();
        for _ in 0..4 {
            limiter.check("k", 3, 300, 100);
        }
        assert_eq!(limiter.check("k", 3, 300, 399), Decision::Limited);
        assert_eq!(limiter.check("k", 3, 300, 400), Decision::Allowed);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = FixedWindowLimiter::new();
        for _ in 0..4 {
            limiter.check("rsvp:1.2.3.4", 3, 300, 100);
        }
        assert_eq!(limiter.check("rsvp:1.2.3.4", 3, 300, 100), Decision::Limited);
        assert_eq!(limiter.check("rsvp:5.6.7.8", 3, 300, 100), Decision::Allowed);
    }

    #[test]
    fn sweep_drops_only_ended_windows() {
        let limiter = FixedWindowLimiter::new();
        limiter.check("old", 3, 300, 100);
        limiter.check("live", 3, 300, 350);

        limiter.sweep(400);

        // "old" ended at 400; a new attempt starts a fresh window.
        assert_eq!(limiter.check("old", 1, 300, 400), Decision::Allowed);
        // "live" kept its count.
        assert_eq!(limiter.check("live", 1, 300, 400), Decision::Limited);
    }
}
