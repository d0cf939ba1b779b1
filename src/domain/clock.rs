use chrono::{DateTime, Utc};

/// Source of the current time for the refresh scheduling.
pub trait SystemClock: std::fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Default)]
pub struct UtcClock;

impl SystemClock for UtcClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
