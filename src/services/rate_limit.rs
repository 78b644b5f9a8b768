// src/services/rate_limit.rs
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

#[derive(Clone, Debug)]
struct RateWindow {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client IP. Increment-then-compare
/// happens under one lock so concurrent hits from the same address cannot
/// lose updates. State is in-memory only; a restart clears it.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, RateWindow>>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    /// Record one request from `key`. Returns false once the counter has
    /// passed the ceiling for the current window; the window rolls over
    /// lazily on the next request after it elapses.
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut guard = self.inner.lock().await;

        let entry = guard
            .entry(key.to_string())
            .or_insert(RateWindow { started: now, count: 0 });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }

    /// Drop windows that have fully elapsed. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut guard = self.inner.lock().await;
        let before = guard.len();
        guard.retain(|_, w| now.duration_since(w.started) < self.window);
        before - guard.len()
    }

    /// Number of addresses currently tracked.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn allows_up_to_the_ceiling_then_rejects() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);
        // Other addresses are unaffected.
        assert!(limiter.check("5.6.7.8").await);
    }

    #[tokio::test]
    async fn window_rollover_resets_the_counter() {
        let limiter = RateLimiter::new(Duration::from_millis(20), 1);
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);

        sleep(Duration::from_millis(30)).await;
        assert!(limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn concurrent_hits_do_not_lose_updates() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 50);
        let mut handles = Vec::new();
        for _ in 0..60 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move { limiter.check("1.2.3.4").await }));
        }
        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 50);
    }

    #[tokio::test]
    async fn purge_drops_only_elapsed_windows() {
        let limiter = RateLimiter::new(Duration::from_millis(20), 10);
        limiter.check("old").await;
        sleep(Duration::from_millis(30)).await;
        limiter.check("fresh").await;

        assert_eq!(limiter.purge_expired().await, 1);
        assert_eq!(limiter.len().await, 1);
    }
}
