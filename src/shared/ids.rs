//! Timestamp helpers and id generation
//!
//! Entry and comment ids are the decimal millisecond Unix time at which they
//! were created. Two records created within the same millisecond would share
//! an id, so [`IdGenerator`] bumps the later one past the last id it issued.
//! Ids stay numeric, unique within the process and sortable by age.

use chrono::{SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current UTC date as `YYYY-MM-DD`, the key used for daily visits
pub fn today_utc() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Monotonic, timestamp-derived id source
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, never equal to or smaller than one issued before
    pub fn next_id(&self) -> String {
        self.next_at(Utc::now().timestamp_millis()).to_string()
    }

    fn next_at(&self, now_millis: i64) -> i64 {
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = if now_millis > previous { now_millis } else { previous + 1 };
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => previous = actual,
            }
        }
    }
}
