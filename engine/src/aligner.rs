//! Slot window generation: one ordered sequence of time slots per target
//! zone, anchored to the home zone's midnight.
//!
//! Every row of the timeline starts at the same UTC instant; the target
//! zone only changes how each instant renders as wall-clock time. Slots
//! are keyed by their UTC instant, never by their label, so repeated
//! local hours around a fall-back transition stay distinct.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::offset::offset_at;

/// Slot spacing for one generated window.
///
/// Fixed once per generation: the cadence a window opens with is the
/// cadence it keeps, even if the zone's offset changes mid-window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// 60-minute steps, 26 slots
    Hourly,
    /// 30-minute steps, 52 slots
    HalfHourly,
}

impl Cadence {
    /// Minutes between consecutive slots
    pub fn step_minutes(&self) -> i64 {
        match self {
            Cadence::Hourly => 60,
            Cadence::HalfHourly => 30,
        }
    }

    /// Total slots in one window: a full day plus two hours of overflow
    pub fn slot_count(&self) -> usize {
        match self {
            Cadence::Hourly => 26,
            Cadence::HalfHourly => 52,
        }
    }

    /// Slots making up one full day, before the overflow region
    pub fn slots_per_day(&self) -> usize {
        match self {
            Cadence::Hourly => 24,
            Cadence::HalfHourly => 48,
        }
    }
}

/// One point on the timeline: a canonical UTC instant plus its rendering
/// in the target zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    /// Local hour in 24-hour format (0-23)
    pub local_hour: u32,
    /// Local minute (0-59)
    pub local_minute: u32,
    /// Compact 12-hour label ("12am", "9:30pm")
    pub label: String,
    /// Full local wall-clock reading
    pub local_wall_clock: NaiveDateTime,
    /// The instant this slot represents; source of truth for everything
    /// else in the struct
    pub utc_instant: DateTime<Utc>,
    /// Whether this slot is the global selection
    pub is_selected: bool,
    /// Local calendar date falls on Saturday or Sunday
    pub is_weekend: bool,
    /// Local calendar date differs from the previous slot's
    pub is_day_boundary: bool,
}

/// Pick the cadence for a window against `zone`, from its offset at the
/// window base.
///
/// Half-hour offsets get 30-minute steps so local labels stay on round
/// hours. Offsets on other sub-hour boundaries (45-minute zones) keep
/// the hourly cadence and carry the residual minutes in their labels;
/// the fixed 26/52 window lengths depend on it.
pub fn cadence_for(zone: Tz, at: DateTime<Utc>) -> Cadence {
    if offset_at(zone, at).utc_offset_minutes.rem_euclid(60) == 30 {
        Cadence::HalfHourly
    } else {
        Cadence::Hourly
    }
}

/// UTC instant for a wall-clock time in `zone`.
///
/// Wall times are not always representable: spring-forward transitions
/// skip them and fall-back transitions duplicate them. Duplicates take
/// the earliest mapping; skipped times probe forward in 30-minute steps
/// to the first wall time the zone can express.
pub fn resolve_wall(zone: Tz, wall: NaiveDateTime) -> DateTime<Utc> {
    let mut wall = wall;
    for _ in 0..48 {
        match zone.from_local_datetime(&wall) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(first, _) => return first.with_timezone(&Utc),
            LocalResult::None => wall = wall + Duration::minutes(30),
        }
    }
    // Only reachable for zones that skipped an entire calendar day
    // (Pacific/Kiritimati, 1994); read the wall time as UTC.
    Utc.from_utc_datetime(&wall)
}

/// UTC instant of `zone`'s local midnight on `date`, applying the DST
/// rules in force on that date.
///
/// Midnight itself can be skipped (America/Santiago springs forward at
/// 00:00); the window then opens at the first representable wall time.
pub fn home_midnight(zone: Tz, date: NaiveDate) -> DateTime<Utc> {
    resolve_wall(zone, date.and_time(NaiveTime::MIN))
}

/// Generate one window of slots for `target`, anchored at `utc_base`.
///
/// `selected_column` marks `is_selected` and is meaningful only for the
/// home row; other rows are marked afterwards by matching `utc_instant`,
/// since their cadence may differ from the home row's.
pub fn align(
    utc_base: DateTime<Utc>,
    target: Tz,
    selected_column: Option<usize>,
) -> Vec<TimeSlot> {
    let cadence = cadence_for(target, utc_base);
    let mut slots = Vec::with_capacity(cadence.slot_count());
    let mut prev_date: Option<NaiveDate> = None;

    for i in 0..cadence.slot_count() {
        let utc_instant = utc_base + Duration::minutes(cadence.step_minutes() * i as i64);
        let local = utc_instant.with_timezone(&target);
        let local_date = local.date_naive();

        slots.push(TimeSlot {
            local_hour: local.hour(),
            local_minute: local.minute(),
            label: wall_label(local.hour(), local.minute()),
            local_wall_clock: local.naive_local(),
            utc_instant,
            is_selected: selected_column == Some(i),
            is_weekend: matches!(local.weekday(), Weekday::Sat | Weekday::Sun),
            is_day_boundary: prev_date.map_or(true, |prev| prev != local_date),
        });
        prev_date = Some(local_date);
    }

    slots
}

/// Compact 12-hour label: "12am", "3pm", "9:30am", "5:45pm".
pub fn wall_label(hour24: u32, minute: u32) -> String {
    let hour12 = match hour24 {
        0 => 12,
        1..=12 => hour24,
        _ => hour24 - 12,
    };
    let meridiem = if hour24 < 12 { "am" } else { "pm" };
    if minute == 0 {
        format!("{}{}", hour12, meridiem)
    } else {
        format!("{}:{:02}{}", hour12, minute, meridiem)
    }
}
