use chrono::{DateTime, SubsecRound, Utc};

/// Source of "now" for created_at / updated_at / deleted_at stamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to the microsecond precision PostgreSQL stores
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

#[cfg(test)]
pub use manual::ManualClock;
