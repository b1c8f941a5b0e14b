//! Ordered collection of the locations on the timeline.
//!
//! Index 0 is always the home location, carried by a reserved id that is
//! re-assigned in one place after every structural mutation rather than
//! checked ad hoc at call sites. Slot sequences are wholesale-replaced
//! on refresh, never patched.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::aligner::{self, TimeSlot};
use crate::offset::offset_at;
use crate::snapshot::ZoneSnapshot;

/// Stable identity for one location row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub u64);

impl LocationId {
    /// Reserved id of the home row, whichever city occupies it
    pub const HOME: LocationId = LocationId(0);
}

/// Immutable description of one city/zone pair
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDescriptor {
    /// IANA zone backing this location
    pub zone: Tz,
    /// Display city name
    pub city: String,
    /// Display country name (empty when built from a bare zone id)
    pub country: String,
    /// UTC offset in minutes at the moment the descriptor was created
    pub snapshot_offset_minutes: i32,
    /// Flag emoji, when the lookup source provides one
    pub flag: Option<String>,
}

impl ZoneDescriptor {
    /// Build a descriptor from lookup data.
    pub fn new(
        zone: Tz,
        city: &str,
        country: &str,
        flag: Option<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            zone,
            city: city.to_string(),
            country: country.to_string(),
            snapshot_offset_minutes: offset_at(zone, at).utc_offset_minutes,
            flag,
        }
    }

    /// Build a descriptor from a bare zone, deriving the city from the
    /// zone name ("America/New_York" -> "New York").
    pub fn from_zone(zone: Tz, at: DateTime<Utc>) -> Self {
        Self::new(zone, &city_from_zone_name(zone.name()), "", None, at)
    }

    /// IANA identifier of the backing zone
    pub fn zone_id(&self) -> &'static str {
        self.zone.name()
    }
}

/// Display city derived from an IANA zone name.
fn city_from_zone_name(name: &str) -> String {
    let segment = name.rsplit('/').next().unwrap_or(name);
    segment.replace('_', " ")
}

/// One row of the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub zone: ZoneDescriptor,
    /// Cosmetic "what the clock shows now" data, tick-refreshed
    pub last_refreshed: Option<ZoneSnapshot>,
    /// Generated window; empty until the first refresh
    pub slots: Vec<TimeSlot>,
}

impl Location {
    fn new(id: LocationId, zone: ZoneDescriptor) -> Self {
        Self {
            id,
            zone,
            last_refreshed: None,
            slots: Vec::new(),
        }
    }
}

/// Ordered locations, never empty, home at index 0.
#[derive(Debug, Clone)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    next_id: u64,
}

impl LocationRegistry {
    /// Create a registry with `home` as its single, home-labeled row.
    pub fn new(home: ZoneDescriptor) -> Self {
        Self {
            locations: vec![Location::new(LocationId::HOME, home)],
            next_id: 1,
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// The home row. The registry is never empty, so this always exists.
    pub fn home(&self) -> &Location {
        &self.locations[0]
    }

    /// The zone the timeline is aligned to
    pub fn home_zone(&self) -> Tz {
        self.locations[0].zone.zone
    }

    /// Append a location unless the same zone/city pair is already
    /// present. Returns whether anything was added.
    pub fn add(&mut self, descriptor: ZoneDescriptor) -> bool {
        let duplicate = self
            .locations
            .iter()
            .any(|l| l.zone.zone == descriptor.zone && l.zone.city == descriptor.city);
        if duplicate {
            return false;
        }
        let id = LocationId(self.next_id);
        self.next_id += 1;
        self.locations.push(Location::new(id, descriptor));
        true
    }

    /// Remove a location by id. Removing the last remaining row or an
    /// unknown id is a no-op. Returns whether a row was removed.
    pub fn remove(&mut self, id: LocationId) -> bool {
        if self.locations.len() == 1 {
            return false;
        }
        let Some(position) = self.locations.iter().position(|l| l.id == id) else {
            return false;
        };
        self.locations.remove(position);
        self.relabel_home();
        true
    }

    /// Apply a permutation of the current order: `new_order[i]` is the
    /// current index of the row that should land at position i. A
    /// malformed permutation is ignored. Returns whether the order was
    /// applied.
    pub fn reorder(&mut self, new_order: &[usize]) -> bool {
        if !is_permutation(new_order, self.locations.len()) {
            log::warn!("ignoring malformed reorder permutation {:?}", new_order);
            return false;
        }
        let mut reordered = Vec::with_capacity(self.locations.len());
        for &index in new_order {
            reordered.push(self.locations[index].clone());
        }
        self.locations = reordered;
        self.relabel_home();
        true
    }

    /// Re-assign the reserved home id to whatever occupies index 0.
    ///
    /// The single place the "index 0 is home" invariant is enforced;
    /// called after every structural mutation.
    fn relabel_home(&mut self) {
        if self.locations[0].id == LocationId::HOME {
            return;
        }
        // The previous holder, if still present, needs a fresh id first.
        if let Some(previous) = self
            .locations
            .iter_mut()
            .find(|l| l.id == LocationId::HOME)
        {
            previous.id = LocationId(self.next_id);
            self.next_id += 1;
        }
        self.locations[0].id = LocationId::HOME;
    }

    /// Regenerate every row's slots against the current anchor and
    /// selection. Pure given its inputs; returns whether any sequence
    /// changed by value, so callers can skip redundant downstream
    /// updates.
    pub fn refresh_all(
        &mut self,
        anchor_utc: DateTime<Utc>,
        selected_column: Option<usize>,
        selected_utc: Option<DateTime<Utc>>,
    ) -> bool {
        let mut changed = false;
        for (index, location) in self.locations.iter_mut().enumerate() {
            let slots = if index == 0 {
                // Home row selection goes by column index.
                aligner::align(anchor_utc, location.zone.zone, selected_column)
            } else {
                // Other rows go by instant: their cadence may differ
                // from the home row's, so the index means nothing here.
                let mut slots = aligner::align(anchor_utc, location.zone.zone, None);
                if let Some(selected) = selected_utc {
                    for slot in &mut slots {
                        slot.is_selected = slot.utc_instant == selected;
                    }
                }
                slots
            };
            if slots != location.slots {
                location.slots = slots;
                changed = true;
            }
        }
        changed
    }

    /// Refresh every row's cosmetic snapshot to `now`.
    pub fn refresh_snapshots(&mut self, now: DateTime<Utc>) {
        for location in &mut self.locations {
            location.last_refreshed = Some(ZoneSnapshot::capture(location.zone.zone, now));
        }
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in order {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn descriptor(zone_id: &str) -> ZoneDescriptor {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        ZoneDescriptor::from_zone(zone_id.parse().unwrap(), at)
    }

    fn registry() -> LocationRegistry {
        let mut registry = LocationRegistry::new(descriptor("America/New_York"));
        registry.add(descriptor("Europe/London"));
        registry.add(descriptor("Asia/Tokyo"));
        registry
    }

    #[test]
    fn test_city_from_zone_name() {
        assert_eq!(city_from_zone_name("America/New_York"), "New York");
        assert_eq!(city_from_zone_name("America/Argentina/Buenos_Aires"), "Buenos Aires");
        assert_eq!(city_from_zone_name("UTC"), "UTC");
    }

    #[test]
    fn test_add_deduplicates() {
        let mut registry = registry();
        assert_eq!(registry.len(), 3);
        assert!(!registry.add(descriptor("Europe/London")));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_same_zone_different_city_is_not_a_duplicate() {
        let mut registry = registry();
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let newark = ZoneDescriptor::new("America/New_York".parse().unwrap(), "Newark", "USA", None, at);
        assert!(registry.add(newark));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_remove_last_row_is_noop() {
        let mut registry = LocationRegistry::new(descriptor("America/New_York"));
        assert!(!registry.remove(LocationId::HOME));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_home_promotes_next_row() {
        let mut registry = registry();
        assert!(registry.remove(LocationId::HOME));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.home().id, LocationId::HOME);
        assert_eq!(registry.home().zone.city, "London");
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut registry = registry();
        assert!(!registry.remove(LocationId(99)));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_reorder_relabels_home() {
        let mut registry = registry();
        // Move Tokyo (index 2) to the front.
        assert!(registry.reorder(&[2, 0, 1]));
        assert_eq!(registry.home().id, LocationId::HOME);
        assert_eq!(registry.home().zone.city, "Tokyo");
        // The old home row kept its place in line but got a fresh id.
        assert_eq!(registry.locations()[1].zone.city, "New York");
        assert_ne!(registry.locations()[1].id, LocationId::HOME);
    }

    #[test]
    fn test_reorder_rejects_malformed_permutations() {
        let mut registry = registry();
        assert!(!registry.reorder(&[0, 1]));
        assert!(!registry.reorder(&[0, 1, 1]));
        assert!(!registry.reorder(&[0, 1, 5]));
        assert_eq!(registry.home().zone.city, "New York");
    }

    #[test]
    fn test_refresh_all_aligns_every_row_to_the_same_base() {
        let mut registry = registry();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap();
        registry.refresh_all(anchor, Some(3), None);

        for location in registry.locations() {
            assert_eq!(location.slots[0].utc_instant, anchor);
        }
        assert!(registry.home().slots[3].is_selected);
    }

    #[test]
    fn test_refresh_all_is_idempotent() {
        let mut registry = registry();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap();
        let selected = anchor + chrono::Duration::hours(3);

        assert!(registry.refresh_all(anchor, Some(3), Some(selected)));
        let first: Vec<Vec<TimeSlot>> = registry
            .locations()
            .iter()
            .map(|l| l.slots.clone())
            .collect();

        assert!(!registry.refresh_all(anchor, Some(3), Some(selected)));
        let second: Vec<Vec<TimeSlot>> = registry
            .locations()
            .iter()
            .map(|l| l.slots.clone())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_refresh_all_marks_other_rows_by_instant() {
        let mut registry = LocationRegistry::new(descriptor("America/New_York"));
        registry.add(descriptor("Asia/Kolkata"));
        let anchor = Utc.with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap();
        let selected = anchor + chrono::Duration::hours(3);
        registry.refresh_all(anchor, Some(3), Some(selected));

        // Home row: column 3. Kolkata row: the 30-minute cadence puts
        // the same instant at column 6.
        assert!(registry.home().slots[3].is_selected);
        let kolkata = &registry.locations()[1];
        assert_eq!(kolkata.slots.len(), 52);
        assert!(kolkata.slots[6].is_selected);
        assert_eq!(kolkata.slots.iter().filter(|s| s.is_selected).count(), 1);
    }

    #[test]
    fn test_refresh_snapshots() {
        let mut registry = registry();
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        registry.refresh_snapshots(now);
        for location in registry.locations() {
            let snapshot = location.last_refreshed.as_ref().unwrap();
            assert_eq!(snapshot.taken_at, now);
        }
    }
}
