use chrono::{NaiveDate, Utc};

/// Source of "now" for components that need the current date or time.
///
/// Injecting the clock keeps date fallbacks deterministic in tests instead
/// of silently depending on the wall clock.
pub trait Clock: Send + Sync {
    /// Current calendar date (UTC).
    fn today(&self) -> NaiveDate;

    /// Current unix timestamp in seconds.
    fn timestamp(&self) -> i64;
}

/// Wall-clock implementation used by the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock pinned to a fixed date, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub date: NaiveDate,
    pub timestamp: i64,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        let timestamp = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default();
        Self { date, timestamp }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
