//! UTC offset resolution against the IANA zone database.
//!
//! Thin wrapper over chrono-tz: offsets and DST status at arbitrary
//! instants, zone-id parsing, and the system-default fallback zone.

use chrono::{DateTime, Local, Offset, Utc};
use chrono_tz::{OffsetComponents, Tz};

/// UTC offset data for one zone at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneOffset {
    /// Offset from UTC in minutes (e.g., -300 for UTC-5)
    pub utc_offset_minutes: i32,
    /// Whether daylight saving is in effect at the instant
    pub is_dst: bool,
}

/// Resolve a zone's UTC offset at a specific instant.
///
/// Valid for arbitrary historical and future instants; chrono-tz carries
/// the full transition tables, so this never degrades to "now".
pub fn offset_at(zone: Tz, instant: DateTime<Utc>) -> ZoneOffset {
    let local = instant.with_timezone(&zone);
    let offset = local.offset();
    ZoneOffset {
        utc_offset_minutes: offset.fix().local_minus_utc() / 60,
        is_dst: !offset.dst_offset().is_zero(),
    }
}

/// Error type for zone-id resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneResolutionError {
    /// The identifier that failed to parse
    pub zone_id: String,
}

impl std::fmt::Display for ZoneResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown time zone: {}", self.zone_id)
    }
}

impl std::error::Error for ZoneResolutionError {}

/// Parse an IANA zone identifier.
pub fn resolve_zone(zone_id: &str) -> Result<Tz, ZoneResolutionError> {
    zone_id.parse::<Tz>().map_err(|_| ZoneResolutionError {
        zone_id: zone_id.to_string(),
    })
}

/// Parse a zone identifier, substituting the system default on failure.
///
/// Resolution failures are absorbed here; downstream code always receives
/// a usable zone.
pub fn resolve_zone_or_default(zone_id: &str) -> Tz {
    match resolve_zone(zone_id) {
        Ok(zone) => zone,
        Err(e) => {
            let fallback = fallback_zone();
            log::warn!("{}, substituting {}", e, fallback.name());
            fallback
        }
    }
}

/// Get the system's local timezone, if it maps onto an IANA name.
pub fn system_timezone() -> Option<Tz> {
    // The %Z rendering is an abbreviation more often than an IANA name,
    // so this frequently comes back None.
    let tz_name = Local::now().format("%Z").to_string();
    tz_name.parse::<Tz>().ok()
}

/// The zone substituted when resolution fails: the system zone when it is
/// identifiable, UTC otherwise.
pub fn fallback_zone() -> Tz {
    system_timezone().unwrap_or(Tz::UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_offset_at_standard_time() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let offset = offset_at(tz, instant);
        assert_eq!(offset.utc_offset_minutes, -300);
        assert!(!offset.is_dst);
    }

    #[test]
    fn test_offset_at_daylight_time() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let offset = offset_at(tz, instant);
        assert_eq!(offset.utc_offset_minutes, -240);
        assert!(offset.is_dst);
    }

    #[test]
    fn test_offset_at_half_hour_zone() {
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let offset = offset_at(tz, instant);
        assert_eq!(offset.utc_offset_minutes, 330);
        assert!(!offset.is_dst);
    }

    #[test]
    fn test_offset_at_historical_date() {
        // US DST rules differed in 1980; the offset is still resolved from
        // the tables, not extrapolated from the present.
        let tz: Tz = "America/New_York".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(1980, 6, 1, 12, 0, 0).unwrap();
        let offset = offset_at(tz, instant);
        assert_eq!(offset.utc_offset_minutes, -240);
        assert!(offset.is_dst);
    }

    #[test]
    fn test_resolve_zone() {
        assert!(resolve_zone("Europe/London").is_ok());
        let err = resolve_zone("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(err.zone_id, "Mars/Olympus_Mons");
    }

    #[test]
    fn test_resolve_zone_or_default_falls_back() {
        let zone = resolve_zone_or_default("Not/A_Zone");
        assert_eq!(zone, fallback_zone());
    }
}
