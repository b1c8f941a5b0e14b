//! Free-text search over the bundled zone list.
//!
//! Covers the built-in case of finding a zone by name; a richer city
//! database (country codes, population ranking) is the host's concern
//! and plugs in by constructing descriptors directly.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::registry::ZoneDescriptor;

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneCandidate {
    /// The matched zone
    pub zone: Tz,
    /// City segment of the zone name, de-underscored ("New York")
    pub city: String,
    /// Leading region segment ("America", "Europe"); empty for
    /// single-segment names
    pub region: String,
}

impl ZoneCandidate {
    fn from_zone(zone: Tz) -> Self {
        let name = zone.name();
        let (region, rest) = match name.split_once('/') {
            Some((region, rest)) => (region, rest),
            None => ("", name),
        };
        let city = rest.rsplit('/').next().unwrap_or(rest);
        Self {
            zone,
            city: city.replace('_', " "),
            region: region.to_string(),
        }
    }

    /// IANA identifier of the matched zone
    pub fn zone_id(&self) -> &'static str {
        self.zone.name()
    }

    /// Build a location descriptor for this candidate.
    pub fn descriptor(&self, at: DateTime<Utc>) -> ZoneDescriptor {
        ZoneDescriptor::new(self.zone, &self.city, "", None, at)
    }
}

/// Case-insensitive substring search over all bundled zones.
///
/// Spaces in the query match the underscores in zone names, so "new
/// york" finds America/New_York.
pub fn search_zones(query: &str) -> Vec<ZoneCandidate> {
    let query = query.trim().to_lowercase().replace(' ', "_");
    if query.is_empty() {
        return Vec::new();
    }
    chrono_tz::TZ_VARIANTS
        .iter()
        .filter(|zone| zone.name().to_lowercase().contains(&query))
        .map(|zone| ZoneCandidate::from_zone(*zone))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_search_matches_with_spaces() {
        let results = search_zones("new york");
        assert!(results.iter().any(|c| c.zone_id() == "America/New_York"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let results = search_zones("KOLKATA");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].city, "Kolkata");
        assert_eq!(results[0].region, "Asia");
    }

    #[test]
    fn test_search_empty_query_returns_nothing() {
        assert!(search_zones("").is_empty());
        assert!(search_zones("   ").is_empty());
    }

    #[test]
    fn test_candidate_for_nested_zone_name() {
        // The bundled list also carries the America/Buenos_Aires link
        // alias; the canonical nested name still derives cleanly.
        let results = search_zones("buenos aires");
        let canonical = results
            .iter()
            .find(|c| c.zone_id() == "America/Argentina/Buenos_Aires")
            .unwrap();
        assert_eq!(canonical.city, "Buenos Aires");
        assert_eq!(canonical.region, "America");
    }

    #[test]
    fn test_descriptor_from_candidate() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let results = search_zones("tokyo");
        let descriptor = results[0].descriptor(at);
        assert_eq!(descriptor.zone_id(), "Asia/Tokyo");
        assert_eq!(descriptor.city, "Tokyo");
        assert_eq!(descriptor.snapshot_offset_minutes, 540);
    }
}
