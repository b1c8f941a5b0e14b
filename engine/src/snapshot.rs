//! Current wall-time display data for one zone.
//!
//! Refreshed by the periodic tick; purely cosmetic, never feeds back
//! into anchoring or selection.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::abbrev::abbreviate;
use crate::offset::offset_at;

/// AM/PM indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    AM,
    PM,
}

impl std::fmt::Display for Meridiem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Meridiem::AM => write!(f, "AM"),
            Meridiem::PM => write!(f, "PM"),
        }
    }
}

/// What a location's clock face shows at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSnapshot {
    /// Day of week
    pub weekday: Weekday,
    /// Hour in 12-hour format (1-12)
    pub hour12: u32,
    /// Hour in 24-hour format (0-23)
    pub hour24: u32,
    /// Minute (0-59)
    pub minute: u32,
    /// AM/PM indicator
    pub meridiem: Meridiem,
    /// UTC offset in minutes (e.g., -480 for UTC-8)
    pub utc_offset_minutes: i32,
    /// Whether DST is in effect
    pub is_dst: bool,
    /// Short zone label (e.g., "PST", "GMT+5:30")
    pub abbreviation: String,
    /// The full local reading for additional formatting needs
    pub local_datetime: DateTime<Tz>,
    /// When this snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl ZoneSnapshot {
    /// Capture what `zone`'s clock shows at `now`.
    pub fn capture(zone: Tz, now: DateTime<Utc>) -> Self {
        let local = now.with_timezone(&zone);

        let hour24 = local.hour();
        let hour12 = match hour24 {
            0 => 12,
            1..=12 => hour24,
            _ => hour24 - 12,
        };
        let meridiem = if hour24 < 12 { Meridiem::AM } else { Meridiem::PM };

        let zone_offset = offset_at(zone, now);

        Self {
            weekday: local.weekday(),
            hour12,
            hour24,
            minute: local.minute(),
            meridiem,
            utc_offset_minutes: zone_offset.utc_offset_minutes,
            is_dst: zone_offset.is_dst,
            abbreviation: abbreviate(zone, now),
            local_datetime: local,
            taken_at: now,
        }
    }

    /// Format the time as "hh:mm AM"
    pub fn format_time(&self) -> String {
        format!("{}:{:02} {}", self.hour12, self.minute, self.meridiem)
    }

    /// Format the date as "Weekday, Month Day, Year"
    pub fn format_date(&self) -> String {
        self.local_datetime.format("%A, %B %-d, %Y").to_string()
    }

    /// Format the UTC offset as "UTC±hh:mm"
    pub fn format_utc_offset(&self) -> String {
        let sign = if self.utc_offset_minutes >= 0 { "+" } else { "-" };
        let abs_minutes = self.utc_offset_minutes.abs();
        format!("UTC{}{:02}:{:02}", sign, abs_minutes / 60, abs_minutes % 60)
    }
}
