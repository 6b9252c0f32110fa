use chrono::Utc;
use std::fmt::Debug;

use super::ChainError;

/// Source of block timestamps (Unix seconds, UTC).
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Result<i64, ChainError>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<i64, ChainError> {
        let secs = Utc::now().timestamp();
        if secs < 0 {
            return Err(ChainError::Clock(format!(
                "system time {secs} is before the Unix epoch"
            )));
        }
        Ok(secs)
    }
}

/// Always reports the same instant. Useful for reproducible hashes.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> Result<i64, ChainError> {
        Ok(self.0)
    }
}
