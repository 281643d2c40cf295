use chrono::{DateTime, FixedOffset, Offset, Utc};
use murmur_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Largest offset a fixed zone can carry (just under a day).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 23 * 60 + 59;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourCycle {
    #[default]
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "24h")]
    H24,
}

/// Short time-of-day label shown beside a message ("3:07 PM" / "15:07").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampFormat {
    pub clock: HourCycle,
    /// Within +/-[`MAX_UTC_OFFSET_MINUTES`]; anything else renders as UTC.
    pub utc_offset_minutes: i32,
    /// Passed through to renderers untouched.
    pub locale: String,
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            clock: HourCycle::H12,
            utc_offset_minutes: 0,
            locale: "en-US".to_string(),
        }
    }
}

impl TimestampFormat {
    pub fn format(&self, created_at: Timestamp) -> String {
        let utc = DateTime::<Utc>::from_timestamp_millis(created_at).unwrap_or_default();
        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        let local = utc.with_timezone(&offset);
        let pattern = match self.clock {
            HourCycle::H12 => "%-I:%M %p",
            HourCycle::H24 => "%H:%M",
        };
        local.format(pattern).to_string()
    }
}
