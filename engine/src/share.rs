//! Flat share-state serialization.
//!
//! The wire shape is deliberately flat and stringly so hosts can render
//! it into URLs or clipboard text without knowing engine internals;
//! rebuilding a grid from it is the inverse operation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::offset::resolve_zone;
use crate::registry::ZoneDescriptor;
use crate::sync::ZoneGrid;

/// Everything needed to reconstruct a timeline, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareState {
    /// "zoneId:city" per location, in display order (index 0 = home)
    pub locations: Vec<String>,
    /// The globally selected instant
    pub selected_utc: DateTime<Utc>,
    /// Home-zone local date the window is anchored to
    pub anchor_date: NaiveDate,
    /// IANA identifier of the home zone
    pub home_zone_id: String,
}

/// Error type for share-state parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareParseError {
    /// The location list was empty
    NoLocations,
    /// A location entry had no usable zone id
    BadZone(String),
}

impl std::fmt::Display for ShareParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareParseError::NoLocations => write!(f, "share state lists no locations"),
            ShareParseError::BadZone(entry) => {
                write!(f, "share state entry has no usable zone id: {}", entry)
            }
        }
    }
}

impl std::error::Error for ShareParseError {}

impl ShareState {
    /// Flatten a grid into share form.
    pub fn capture(grid: &ZoneGrid) -> Self {
        Self {
            locations: grid
                .locations()
                .iter()
                .map(|location| format!("{}:{}", location.zone.zone_id(), location.zone.city))
                .collect(),
            selected_utc: grid.selected_instant(),
            anchor_date: grid.anchor_date(),
            home_zone_id: grid.home_zone_id().to_string(),
        }
    }

    /// Rebuild a grid from share form. The first listed location becomes
    /// home.
    ///
    /// Unknown zone ids fail rather than silently substituting a
    /// default: share strings arrive from outside the process, and a
    /// substituted zone would misrepresent what the sender shared.
    pub fn restore(&self, now: DateTime<Utc>) -> Result<ZoneGrid, ShareParseError> {
        let mut entries = self.locations.iter();
        let home = entries.next().ok_or(ShareParseError::NoLocations)?;

        let mut grid = ZoneGrid::new(descriptor_from_entry(home, now)?, now);
        for entry in entries {
            grid.add_location(descriptor_from_entry(entry, now)?);
        }

        grid.pick_date(self.anchor_date);
        // Re-select the shared instant at its home-row column; an
        // instant inconsistent with the anchor is left where pick_date
        // put the selection.
        let column = grid.locations()[0]
            .slots
            .iter()
            .position(|slot| slot.utc_instant == self.selected_utc);
        if let Some(column) = column {
            grid.click_slot(column, self.selected_utc);
        }
        Ok(grid)
    }
}

fn descriptor_from_entry(
    entry: &str,
    now: DateTime<Utc>,
) -> Result<ZoneDescriptor, ShareParseError> {
    let (zone_id, city) = entry.split_once(':').unwrap_or((entry, ""));
    let zone =
        resolve_zone(zone_id).map_err(|_| ShareParseError::BadZone(entry.to_string()))?;
    if city.is_empty() {
        Ok(ZoneDescriptor::from_zone(zone, now))
    } else {
        Ok(ZoneDescriptor::new(zone, city, "", None, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon_est() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 0).unwrap()
    }

    fn grid() -> ZoneGrid {
        let now = noon_est();
        let mut grid = ZoneGrid::new(
            ZoneDescriptor::from_zone("America/New_York".parse().unwrap(), now),
            now,
        );
        grid.add_location(ZoneDescriptor::from_zone("Asia/Kolkata".parse().unwrap(), now));
        grid.add_location(ZoneDescriptor::from_zone("Europe/London".parse().unwrap(), now));
        grid
    }

    #[test]
    fn test_capture_shape() {
        let state = ShareState::capture(&grid());
        assert_eq!(
            state.locations,
            vec![
                "America/New_York:New York".to_string(),
                "Asia/Kolkata:Kolkata".to_string(),
                "Europe/London:London".to_string(),
            ]
        );
        assert_eq!(state.home_zone_id, "America/New_York");
        assert_eq!(state.anchor_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_round_trip() {
        let mut original = grid();
        let instant = original.selection().anchor_utc + Duration::hours(8);
        original.click_slot(8, instant);

        let state = ShareState::capture(&original);
        let restored = state.restore(noon_est()).unwrap();

        let original_zones: Vec<&str> = original
            .locations()
            .iter()
            .map(|l| l.zone.zone_id())
            .collect();
        let restored_zones: Vec<&str> = restored
            .locations()
            .iter()
            .map(|l| l.zone.zone_id())
            .collect();
        assert_eq!(original_zones, restored_zones);
        assert_eq!(restored.anchor_date(), original.anchor_date());
        assert_eq!(restored.selected_instant(), original.selected_instant());
        assert_eq!(restored.selected_column(), original.selected_column());
        assert_eq!(restored.home_zone_id(), original.home_zone_id());
    }

    #[test]
    fn test_round_trip_survives_serde() {
        let state = ShareState::capture(&grid());
        let encoded = toml::to_string(&state).unwrap();
        let decoded: ShareState = toml::from_str(&encoded).unwrap();
        assert_eq!(state, decoded);
    }

    #[test]
    fn test_restore_rejects_empty_location_list() {
        let state = ShareState {
            locations: Vec::new(),
            selected_utc: noon_est(),
            anchor_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            home_zone_id: "America/New_York".to_string(),
        };
        assert_eq!(state.restore(noon_est()).unwrap_err(), ShareParseError::NoLocations);
    }

    #[test]
    fn test_restore_rejects_unknown_zone() {
        let state = ShareState {
            locations: vec!["Mars/Olympus_Mons:Olympus".to_string()],
            selected_utc: noon_est(),
            anchor_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            home_zone_id: "Mars/Olympus_Mons".to_string(),
        };
        let err = state.restore(noon_est()).unwrap_err();
        assert_eq!(err, ShareParseError::BadZone("Mars/Olympus_Mons:Olympus".to_string()));
    }

    #[test]
    fn test_entry_without_city_derives_one() {
        let descriptor = descriptor_from_entry("Asia/Tokyo", noon_est()).unwrap();
        assert_eq!(descriptor.city, "Tokyo");
    }
}
