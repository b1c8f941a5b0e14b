//! Timezone alignment engine for comparing wall-clock time across
//! cities on one shared timeline.
//!
//! Every location renders the same 26-hour window, anchored to the home
//! zone's midnight, in its own zone, so a column of the timeline is one
//! absolute instant everywhere. The engine owns the hard parts: wall
//! clock to UTC conversion under the DST rules in force on the anchor
//! date, 30-minute-offset zones widening to a 52-slot cadence, and the
//! selection staying meaningful while cities are added, removed,
//! reordered, or promoted to home.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use engine::{ZoneDescriptor, ZoneGrid};
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 0).unwrap();
//! let home = ZoneDescriptor::from_zone("America/New_York".parse().unwrap(), now);
//! let mut grid = ZoneGrid::new(home, now);
//! grid.add_location(ZoneDescriptor::from_zone("Asia/Tokyo".parse().unwrap(), now));
//!
//! // Both rows open at New York's midnight, rendered locally.
//! let rows = grid.locations();
//! assert_eq!(rows[0].slots[0].label, "12am");
//! assert_eq!(rows[1].slots[0].label, "2pm");
//! assert_eq!(rows[0].slots[0].utc_instant, rows[1].slots[0].utc_instant);
//! ```

pub mod abbrev;
pub mod aligner;
pub mod config;
pub mod lookup;
pub mod offset;
pub mod registry;
pub mod share;
pub mod snapshot;
pub mod sync;

pub use abbrev::abbreviate;
pub use aligner::{align, cadence_for, home_midnight, Cadence, TimeSlot};
pub use config::{load_preferences, save_preferences, ConfigError, Preferences};
pub use lookup::{search_zones, ZoneCandidate};
pub use offset::{
    fallback_zone, offset_at, resolve_zone, resolve_zone_or_default, system_timezone, ZoneOffset,
    ZoneResolutionError,
};
pub use registry::{Location, LocationId, LocationRegistry, ZoneDescriptor};
pub use share::{ShareParseError, ShareState};
pub use snapshot::{Meridiem, ZoneSnapshot};
pub use sync::{SelectionState, ZoneGrid};
