use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    window_reset_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

/// Fixed-window request counter keyed by client identity. The store is owned
/// by whoever constructs the limiter; counts are advisory and lost on restart.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn check(&self, client_id: &str) -> RateDecision {
        self.check_at(client_id, Instant::now()).await
    }

    async fn check_at(&self, client_id: &str, now: Instant) -> RateDecision {
        let mut entries = self.entries.lock().await;

        let entry = entries.entry(client_id.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_reset_at: now + self.window,
        });

        if now > entry.window_reset_at {
            entry.count = 1;
            entry.window_reset_at = now + self.window;
            return RateDecision::Allowed;
        }

        if entry.count >= self.max_requests {
            return RateDecision::Limited {
                retry_after: entry.window_reset_at.saturating_duration_since(now),
            };
        }

        entry.count += 1;
        RateDecision::Allowed
    }
}
