// Per-host request pacing for the news crawl.
//
// Every host gets a slot holding its current delay and the earliest instant
// the next request may start. With autothrottle on, the delay follows observed
// latency: it moves halfway toward `latency / target_concurrency`, never below
// that target, clamped to [download_delay, max_delay]. Non-200 responses may
// raise the delay but never lower it.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::{AutoThrottleSettings, FetchSettings};

#[derive(Debug)]
struct Slot {
    delay: Duration,
    next_start: Instant,
}

#[derive(Debug)]
pub struct Throttle {
    min_delay: Duration,
    start_delay: Duration,
    max_delay: Duration,
    target_concurrency: f64,
    adaptive: bool,
    slots: Mutex<HashMap<String, Slot>>,
}

impl Throttle {
    pub fn new(fetch: &FetchSettings, auto: &AutoThrottleSettings) -> Self {
        let min_delay = fetch.download_delay();
        let (start_delay, max_delay) = if auto.enabled {
            (auto.start_delay().max(min_delay), auto.max_delay().max(min_delay))
        } else {
            (min_delay, min_delay)
        };

        Self {
            min_delay,
            start_delay,
            max_delay,
            target_concurrency: auto.target_concurrency,
            adaptive: auto.enabled,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until a request to `host` may start, and reserve the next start time
    pub async fn acquire(&self, host: &str) {
        let wait_until = {
            let mut slots = self.slots.lock().await;
            let now = Instant::now();
            let slot = slots.entry(host.to_string()).or_insert_with(|| Slot {
                delay: self.start_delay,
                next_start: now,
            });
            let start = slot.next_start.max(now);
            slot.next_start = start + slot.delay;
            start
        };
        tokio::time::sleep_until(wait_until).await;
    }

    /// Feed a finished request's latency back into the host's delay
    pub async fn record(&self, host: &str, latency: Duration, status: u16) {
        if !self.adaptive {
            return;
        }
        let mut slots = self.slots.lock().await;
        let Some(slot) = slots.get_mut(host) else {
            return;
        };
        if let Some(delay) = self.next_delay(slot.delay, latency, status) {
            slot.delay = delay;
        }
    }

    /// New delay for a slot, or `None` when it should stay unchanged
    fn next_delay(&self, current: Duration, latency: Duration, status: u16) -> Option<Duration> {
        let target = latency.div_f64(self.target_concurrency);
        let averaged = (current + target) / 2;
        let proposed = averaged.max(target).clamp(self.min_delay, self.max_delay);

        if status != 200 && proposed <= current {
            return None;
        }
        Some(proposed)
    }

    pub async fn current_delay(&self, host: &str) -> Option<Duration> {
        self.slots.lock().await.get(host).map(|slot| slot.delay)
    }
}
