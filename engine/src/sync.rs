//! Selection synchronization: the single writer of shared timeline
//! state.
//!
//! Every mutation funnels through [`ZoneGrid`], updates the (anchor,
//! selected instant, selected column) triple and the registry together,
//! and ends with a full slot regeneration, so readers only ever observe
//! consistent windows. The periodic tick is an explicit event fed in by
//! the host and touches nothing but cosmetic snapshots.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

use crate::aligner::{self, Cadence};
use crate::config::Preferences;
use crate::offset::{fallback_zone, resolve_zone, resolve_zone_or_default};
use crate::registry::{Location, LocationId, LocationRegistry, ZoneDescriptor};

/// Selection-recovery tolerance when the home zone changes
const RESNAP_TOLERANCE_SECONDS: i64 = 60;

/// The shared selection triple. Written only by [`ZoneGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    /// Home-zone local date the window is anchored to
    pub anchor_date: NaiveDate,
    /// UTC instant of the home zone's midnight on `anchor_date`
    pub anchor_utc: DateTime<Utc>,
    /// The globally selected instant
    pub selected_utc: DateTime<Utc>,
    /// Index of the selected slot in the home row
    pub selected_column: usize,
}

/// The timeline engine: locations, selection, and the event protocol
/// keeping them consistent.
#[derive(Debug)]
pub struct ZoneGrid {
    registry: LocationRegistry,
    selection: SelectionState,
    /// Host-provided clock, advanced by [`ZoneGrid::tick`]; feeds the
    /// cosmetic snapshots and the selection re-snap fallback
    now: DateTime<Utc>,
}

impl ZoneGrid {
    /// Create a grid with `home` as its only location, anchored to the
    /// home-local date of `now`, with the current hour selected.
    pub fn new(home: ZoneDescriptor, now: DateTime<Utc>) -> Self {
        let home_zone = home.zone;
        let local = now.with_timezone(&home_zone);
        let anchor_date = local.date_naive();
        let anchor_utc = aligner::home_midnight(home_zone, anchor_date);
        let cadence = aligner::cadence_for(home_zone, anchor_utc);
        let selected_column = column_for_hour(local.hour(), cadence);
        let selected_utc =
            anchor_utc + Duration::minutes(cadence.step_minutes() * selected_column as i64);

        let mut grid = Self {
            registry: LocationRegistry::new(home),
            selection: SelectionState {
                anchor_date,
                anchor_utc,
                selected_utc,
                selected_column,
            },
            now,
        };
        grid.refresh();
        grid
    }

    /// Start a session from saved preferences: the preferred home zone
    /// (system default when unset or unresolvable) plus favorites as
    /// additional rows.
    pub fn from_preferences(preferences: &Preferences, now: DateTime<Utc>) -> Self {
        let home_zone = match &preferences.home_zone {
            Some(zone_id) => resolve_zone_or_default(zone_id),
            None => fallback_zone(),
        };
        let mut grid = Self::new(ZoneDescriptor::from_zone(home_zone, now), now);
        for zone_id in &preferences.favorites {
            match resolve_zone(zone_id) {
                Ok(zone) if zone != home_zone => {
                    grid.add_location(ZoneDescriptor::from_zone(zone, now));
                }
                Ok(_) => {}
                Err(e) => log::warn!("skipping favorite: {}", e),
            }
        }
        grid
    }

    // --- read model ---

    pub fn locations(&self) -> &[Location] {
        self.registry.locations()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_column(&self) -> usize {
        self.selection.selected_column
    }

    pub fn selected_instant(&self) -> DateTime<Utc> {
        self.selection.selected_utc
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.selection.anchor_date
    }

    /// IANA identifier of the zone the timeline is aligned to
    pub fn home_zone_id(&self) -> &'static str {
        self.registry.home_zone().name()
    }

    // --- mutators ---

    /// Add a city to the timeline. Duplicate zone/city pairs are
    /// ignored; the selection is unaffected either way. Returns whether
    /// any row's slots changed.
    pub fn add_location(&mut self, descriptor: ZoneDescriptor) -> bool {
        if !self.registry.add(descriptor) {
            return false;
        }
        self.refresh()
    }

    /// Remove a location. Removing the last remaining row is a no-op.
    /// When the home row goes, the next row becomes home and the
    /// selection re-snaps to the new zone. Returns whether any row's
    /// slots changed.
    pub fn remove_location(&mut self, id: LocationId) -> bool {
        let home_before = self.registry.home_zone();
        if !self.registry.remove(id) {
            return false;
        }
        if self.registry.home_zone() != home_before {
            self.resnap_selection();
        }
        self.refresh()
    }

    /// Reorder locations; `new_order[i]` is the current index of the
    /// row that should land at position i. Whatever lands at index 0
    /// becomes home. Returns whether any row's slots changed.
    pub fn reorder(&mut self, new_order: &[usize]) -> bool {
        let home_before = self.registry.home_zone();
        if !self.registry.reorder(new_order) {
            return false;
        }
        if self.registry.home_zone() != home_before {
            self.resnap_selection();
        }
        self.refresh()
    }

    /// Move the window to a new calendar date, keeping the selected
    /// slot's wall-clock position and column. Returns whether any row's
    /// slots changed.
    pub fn pick_date(&mut self, date: NaiveDate) -> bool {
        let home_zone = self.registry.home_zone();
        let selected_local = self.selection.selected_utc.with_timezone(&home_zone);
        self.selection.anchor_date = date;
        self.selection.anchor_utc = aligner::home_midnight(home_zone, date);
        self.selection.selected_utc =
            aligner::resolve_wall(home_zone, date.and_time(selected_local.time()));
        self.refresh()
    }

    /// Select a slot by home-row column and instant. Clicks in the
    /// overflow region past one home day advance the anchor a day and
    /// rebase the column into the new window. Returns whether any row's
    /// slots changed.
    pub fn click_slot(&mut self, column: usize, instant: DateTime<Utc>) -> bool {
        let home_zone = self.registry.home_zone();
        let cadence = aligner::cadence_for(home_zone, self.selection.anchor_utc);
        let column = column.min(cadence.slot_count() - 1);
        let per_day = cadence.slots_per_day();

        if column >= per_day {
            if let Some(next) = self.selection.anchor_date.succ_opt() {
                self.selection.anchor_date = next;
                self.selection.anchor_utc = aligner::home_midnight(home_zone, next);
            }
            self.selection.selected_column = column - per_day;
        } else {
            self.selection.selected_column = column;
        }
        self.selection.selected_utc = instant;
        self.refresh()
    }

    /// Periodic cosmetic refresh: updates every location's current-time
    /// snapshot and the grid's notion of "now". Anchor and selection are
    /// never touched from here.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.now = now;
        self.registry.refresh_snapshots(now);
    }

    // --- internals ---

    /// Re-snap the selection after the home zone changed: the old column
    /// may be meaningless under the new zone's offset and cadence.
    /// Prefers the slot nearest the previously selected instant, falling
    /// back to the current wall-clock hour in the new home zone.
    fn resnap_selection(&mut self) {
        let home_zone = self.registry.home_zone();
        self.selection.anchor_utc =
            aligner::home_midnight(home_zone, self.selection.anchor_date);
        let cadence = aligner::cadence_for(home_zone, self.selection.anchor_utc);
        let step = cadence.step_minutes();

        let nearby = (0..cadence.slot_count())
            .map(|column| {
                (
                    column,
                    self.selection.anchor_utc + Duration::minutes(step * column as i64),
                )
            })
            .find(|(_, instant)| {
                (*instant - self.selection.selected_utc).num_seconds().abs()
                    <= RESNAP_TOLERANCE_SECONDS
            });

        let (column, instant) = match nearby {
            Some(hit) => hit,
            None => {
                let column = column_for_hour(self.now.with_timezone(&home_zone).hour(), cadence);
                (
                    column,
                    self.selection.anchor_utc + Duration::minutes(step * column as i64),
                )
            }
        };
        self.selection.selected_column = column;
        self.selection.selected_utc = instant;
    }

    /// Regenerate every row against the current selection. Idempotent:
    /// unchanged inputs report no change.
    fn refresh(&mut self) -> bool {
        self.registry.refresh_all(
            self.selection.anchor_utc,
            Some(self.selection.selected_column),
            Some(self.selection.selected_utc),
        )
    }
}

/// Home-row column showing a given wall-clock hour.
fn column_for_hour(hour: u32, cadence: Cadence) -> usize {
    let column = match cadence {
        Cadence::Hourly => hour as usize,
        Cadence::HalfHourly => hour as usize * 2,
    };
    column.min(cadence.slot_count() - 1)
}
