//! Per-host politeness pacing
//!
//! The dispatcher owns a single `Pacer` and asks it, before launching each
//! fetch, how long to wait so that launches against the same host are at
//! least `delay` apart. Different hosts do not slow each other down.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    next_slot: HashMap<String, Instant>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: HashMap::new(),
        }
    }

    /// Reserves the next launch slot for `host` and returns how long to wait for it
    pub fn reserve(&mut self, host: &str, now: Instant) -> Duration {
        if self.delay.is_zero() {
            return Duration::ZERO;
        }

        let slot = self
            .next_slot
            .get(host)
            .copied()
            .filter(|slot| *slot > now)
            .unwrap_or(now);

        self.next_slot.insert(host.to_string(), slot + self.delay);
        slot - now
    }

    /// Waits until a fetch against `host` may be launched
    pub async fn wait(&mut self, host: &str) {
        let wait = self.reserve(host, Instant::now());
        if !wait.is_zero() {
            tracing::debug!("Waiting {:?} before next request to {}", wait, host);
            tokio::time::sleep(wait).await;
        }
    }
}
