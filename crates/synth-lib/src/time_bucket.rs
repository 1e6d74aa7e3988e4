//! Time bucketing over a fixed epoch-relative 24h cycle
//!
//! All functions here are total over non-negative millisecond timestamps.
//! The day is the absolute epoch modulo 24h, not a calendar-local day.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::TimestampMs;

pub const MINUTE_MS: u64 = 60_000;
pub const HOUR_MS: u64 = 60 * MINUTE_MS;
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Width of one baseline slot (10 minutes)
pub const BASELINE_SLOT_MS: u64 = 10 * MINUTE_MS;

/// Number of baseline slots in a day
pub const BASELINE_SLOTS: u32 = (DAY_MS / BASELINE_SLOT_MS) as u32;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Floor a timestamp to the start of its minute
pub fn normalize_timestamp(ts: TimestampMs) -> TimestampMs {
    ts - ts % MINUTE_MS
}

/// Position of a timestamp within the 24h cycle
pub fn get_24_hour_cycle(ts: TimestampMs) -> TimestampMs {
    ts % DAY_MS
}

/// 10-minute baseline slot (0..=143) for a position within the cycle
pub fn get_baseline_10min_slot(cycle_time: TimestampMs) -> u32 {
    ((cycle_time % DAY_MS) / BASELINE_SLOT_MS) as u32
}

/// Hour and minute within the 24h cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Build a time of day.
    ///
    /// Minutes past 59 carry into the next hour; the result must still land
    /// before 24:00.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        let minute_of_day = hour
            .checked_mul(60)
            .and_then(|m| m.checked_add(minute))
            .filter(|m| hour < 24 && *m < MINUTES_PER_DAY)
            .ok_or(EngineError::InvalidTimeOfDay { hour, minute })?;

        Ok(Self::from_minute_of_day(minute_of_day))
    }

    /// Time of day at which a timestamp falls
    pub fn from_timestamp(ts: TimestampMs) -> Self {
        let minute_of_day = (get_24_hour_cycle(ts) / MINUTE_MS) as u32;
        Self::from_minute_of_day(minute_of_day)
    }

    fn from_minute_of_day(minute_of_day: u32) -> Self {
        Self {
            hour: (minute_of_day / 60) as u8,
            minute: (minute_of_day % 60) as u8,
        }
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    pub fn minute_of_day(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
