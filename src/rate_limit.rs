//! Sliding-window admission control for outbound requests.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::info;

/// Admits at most `max_requests` calls in any trailing `window`.
///
/// Callers over the limit are suspended until the oldest admission leaves
/// the window. The lock is held while waiting, so queued callers are
/// admitted one at a time in arrival order.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    admissions: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            admissions: Mutex::new(VecDeque::new()),
        }
    }

    /// Waits until a request may start, records it, and returns how long
    /// the caller was held back.
    pub async fn acquire(&self) -> Duration {
        let mut admissions = self.admissions.lock().await;
        let now = Instant::now();
        self.prune(&mut admissions, now);

        let mut waited = Duration::ZERO;
        if admissions.len() >= self.max_requests {
            if let Some(&oldest) = admissions.front() {
                let wait = self.window.saturating_sub(now.duration_since(oldest));
                if !wait.is_zero() {
                    info!("Rate limit reached, waiting {:.2} seconds", wait.as_secs_f64());
                    sleep(wait).await;
                    waited = wait;
                }
            }
            let now = Instant::now();
            self.prune(&mut admissions, now);
        }

        admissions.push_back(Instant::now());
        waited
    }

    /// Number of admissions inside the current window.
    pub async fn in_window(&self) -> usize {
        let mut admissions = self.admissions.lock().await;
        self.prune(&mut admissions, Instant::now());
        admissions.len()
    }

    fn prune(&self, admissions: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = admissions.front() {
            if now.duration_since(oldest) < self.window {
                break;
            }
            admissions.pop_front();
        }
    }
}
