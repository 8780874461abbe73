use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Sliding-window request limiter keyed by user id.
///
/// Owned by the dispatcher actor, so it needs no locking.
pub struct RateLimiter {
    /// Timestamps of accepted requests per user, oldest first.
    requests: HashMap<String, VecDeque<Instant>>,
    /// The maximum number of requests allowed within `window`.
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            requests: HashMap::new(),
            limit,
            window,
        }
    }

    /// Records a request for `user_id` if the user is under the limit.
    ///
    /// Returns `false` without recording anything when the limit is reached.
    pub fn check(&mut self, user_id: &str) -> bool {
        self.check_at(user_id, Instant::now())
    }

    fn check_at(&mut self, user_id: &str, now: Instant) -> bool {
        let history = self.requests.entry(user_id.to_string()).or_default();

        while let Some(&oldest) = history.front() {
            if now.duration_since(oldest) >= self.window {
                history.pop_front();
            } else {
                break;
            }
        }

        if history.len() < self.limit {
            history.push_back(now);
            true
        } else {
            false
        }
    }

    /// Drops users with no request inside the current window.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.requests.retain(|_, history| {
            history
                .back()
                .is_some_and(|&last| now.duration_since(last) < window)
        });
    }
}
