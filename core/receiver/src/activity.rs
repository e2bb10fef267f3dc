//! Last-activity clock for idle shutdown.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;

/// Epoch-millisecond timestamp of the most recent request.
#[derive(Debug)]
pub struct ActivityClock {
    last_ms: AtomicI64,
}

impl Default for ActivityClock {
    fn default() -> Self {
        Self::starting_at(now_ms())
    }
}

impl ActivityClock {
    pub fn starting_at(ms: i64) -> Self {
        Self {
            last_ms: AtomicI64::new(ms),
        }
    }

    pub fn touch(&self) {
        self.touch_at(now_ms());
    }

    /// Never moves the clock backwards.
    pub fn touch_at(&self, ms: i64) {
        self.last_ms.fetch_max(ms, Ordering::SeqCst);
    }

    pub fn idle_for_at(&self, now: i64) -> Duration {
        let idle = now.saturating_sub(self.last_ms.load(Ordering::SeqCst));
        Duration::from_millis(u64::try_from(idle).unwrap_or(0))
    }

    pub fn idle_for(&self) -> Duration {
        self.idle_for_at(now_ms())
    }

    pub fn is_idle_at(&self, now: i64, threshold: Duration) -> bool {
        self.idle_for_at(now) > threshold
    }
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
