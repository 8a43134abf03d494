//! Tracking session: the satellite table, observer position and time cursor.
//!
//! One session owns all mutable tracking state. A tick runs the
//! propagate -> geodetic -> visibility pipeline for every satellite at the
//! session's current instant; the driver decides the cadence.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::elements::{Constellation, ElementSet};
use crate::error::TrackError;
use crate::geodetic::{eci_to_geodetic, GeodeticPosition};
use crate::propagator::propagate;
use crate::visibility::{compute_visibility, VisibilityResult};

/// Observer location in degrees, sea level assumed. Constructed only through
/// the validating constructor, so a held value is always in range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ObserverPosition {
    latitude: f64,
    longitude: f64,
}

impl ObserverPosition {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TrackError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(TrackError::InvalidCoordinates(
                "Coordinates must be numbers".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(TrackError::InvalidCoordinates(
                "Latitude must be between -90 and 90 degrees".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(TrackError::InvalidCoordinates(
                "Longitude must be between -180 and 180 degrees".to_string(),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Clone, Copy, Debug)]
struct Computed {
    position: GeodeticPosition,
    visibility: VisibilityResult,
}

/// One satellite in the table: its element set plus the last computed state.
#[derive(Clone, Debug)]
pub struct TrackedSatellite {
    elements: ElementSet,
    computed: Option<Computed>,
    stale: bool,
}

impl TrackedSatellite {
    fn new(elements: ElementSet) -> Self {
        Self {
            elements,
            computed: None,
            stale: false,
        }
    }

    pub fn elements(&self) -> &ElementSet {
        &self.elements
    }

    /// True when the last tick could not attribute a position and the entry
    /// still carries the previous one.
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Per-satellite record handed to rendering and table collaborators.
#[derive(Clone, Debug, Serialize)]
pub struct SnapshotEntry {
    pub name: String,
    pub constellation: Constellation,
    pub position: GeodeticPosition,
    pub visibility: VisibilityResult,
    pub stale: bool,
}

pub struct TrackingSession {
    satellites: HashMap<String, TrackedSatellite>,
    observer: ObserverPosition,
    cursor: DateTime<Utc>,
}

impl TrackingSession {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TrackError> {
        Ok(Self {
            satellites: HashMap::new(),
            observer: ObserverPosition::new(latitude, longitude)?,
            cursor: Utc::now(),
        })
    }

    /// Replaces the satellite table wholesale from freshly parsed element
    /// sets. The new table is built first and swapped in as one assignment;
    /// satellites also present in the old table keep their last computed
    /// state until the next tick. An empty load is rejected and leaves the
    /// table untouched.
    pub fn load(&mut self, sets: Vec<ElementSet>) -> Result<usize, TrackError> {
        if sets.is_empty() {
            return Err(TrackError::NoElementSetsLoaded);
        }
        let mut table = HashMap::with_capacity(sets.len());
        for set in sets {
            let name = set.name().to_string();
            let mut entry = TrackedSatellite::new(set);
            if let Some(previous) = self.satellites.get(&name) {
                entry.computed = previous.computed;
                entry.stale = previous.stale;
            }
            table.insert(name, entry);
        }
        let count = table.len();
        self.satellites = table;
        log::info!("satellite table loaded with {} entries", count);
        Ok(count)
    }

    pub fn clear(&mut self) {
        self.satellites.clear();
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn observer(&self) -> ObserverPosition {
        self.observer
    }

    pub fn satellite(&self, name: &str) -> Option<&TrackedSatellite> {
        self.satellites.get(name)
    }

    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor
    }

    /// Validates and applies a new observer position, then recomputes every
    /// satellite against it. On rejection the prior position stays in effect.
    pub fn set_observer(&mut self, latitude: f64, longitude: f64) -> Result<(), TrackError> {
        self.observer = ObserverPosition::new(latitude, longitude)?;
        self.recompute();
        Ok(())
    }

    /// Moves the time cursor and recomputes. Real-time and simulated instants
    /// are indistinguishable here; any instant is accepted.
    pub fn set_cursor(&mut self, at: DateTime<Utc>) {
        self.cursor = at;
        self.recompute();
    }

    /// Cursor form used by date-picker plus minutes-of-day controls.
    pub fn set_cursor_date_minutes(&mut self, date: NaiveDate, minutes_of_day: u32) {
        let midnight = date.and_time(NaiveTime::MIN).and_utc();
        self.set_cursor(midnight + Duration::minutes(i64::from(minutes_of_day)));
    }

    /// One tick: runs the full pipeline for every satellite at the current
    /// cursor. A satellite with no attributable position keeps its previous
    /// computed state and is flagged stale instead of being dropped.
    pub fn recompute(&mut self) {
        let mut stale = 0usize;
        for sat in self.satellites.values_mut() {
            match propagate(&sat.elements, self.cursor) {
                Some(eci) => {
                    let position = eci_to_geodetic(&eci, self.cursor);
                    let visibility = compute_visibility(
                        self.observer.latitude,
                        self.observer.longitude,
                        &position,
                    );
                    sat.computed = Some(Computed {
                        position,
                        visibility,
                    });
                    sat.stale = false;
                }
                None => {
                    sat.stale = true;
                    stale += 1;
                }
            }
        }
        if stale > 0 {
            log::debug!("{} satellites without a position this tick", stale);
        }
    }

    /// Snapshot of every satellite with at least one computed state, ordered
    /// by name so consumers see a deterministic sequence.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        let mut entries: Vec<SnapshotEntry> = self
            .satellites
            .iter()
            .filter_map(|(name, sat)| {
                sat.computed.map(|computed| SnapshotEntry {
                    name: name.clone(),
                    constellation: sat.elements.constellation(),
                    position: computed.position,
                    visibility: computed.visibility,
                    stale: sat.stale,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::parse_element_sets;
    use crate::testutil::{gps_epoch as epoch, gps_sets, GPS_NAME};
    use chrono::TimeZone;

    fn broken_sets(name: &str) -> Vec<ElementSet> {
        // Passes the feed format patterns, fails sgp4 parsing.
        let raw = format!("{}\n1 00001U SHORT\n2 00001 SHORT\n", name);
        parse_element_sets(&raw, Constellation::Gps)
    }

    fn ankara_session() -> TrackingSession {
        TrackingSession::new(39.9334, 32.8597).unwrap()
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let mut session = ankara_session();
        let err = session.set_observer(95.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            TrackError::InvalidCoordinates(
                "Latitude must be between -90 and 90 degrees".to_string()
            )
        );
        assert_eq!(session.observer().latitude(), 39.9334);
        assert_eq!(session.observer().longitude(), 32.8597);
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        let mut session = ankara_session();
        let err = session.set_observer(0.0, -200.0).unwrap_err();
        assert_eq!(
            err,
            TrackError::InvalidCoordinates(
                "Longitude must be between -180 and 180 degrees".to_string()
            )
        );
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let err = ObserverPosition::new(f64::NAN, 0.0).unwrap_err();
        assert_eq!(
            err,
            TrackError::InvalidCoordinates("Coordinates must be numbers".to_string())
        );
    }

    #[test]
    fn empty_load_is_rejected_and_table_kept() {
        let mut session = ankara_session();
        session.load(gps_sets()).unwrap();
        assert_eq!(session.len(), 1);

        let err = session.load(Vec::new()).unwrap_err();
        assert_eq!(err, TrackError::NoElementSetsLoaded);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn ankara_gps_scenario() {
        let mut session = ankara_session();
        session.load(gps_sets()).unwrap();
        session.set_cursor(epoch());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 1);
        let entry = &snapshot[0];
        assert_eq!(entry.name, GPS_NAME);
        assert_eq!(entry.constellation, Constellation::Gps);
        assert!(!entry.stale);

        let alt_km = entry.position.altitude_m / 1000.0;
        assert!((19_000.0..21_000.0).contains(&alt_km), "altitude {} km", alt_km);
        assert!(entry.position.latitude_deg.abs() <= 90.0);
        assert!(entry.position.longitude_deg.abs() <= 180.0);
        assert!((0.0..360.0).contains(&entry.visibility.azimuth_deg));
        assert_eq!(entry.visibility.visible, entry.visibility.elevation_deg > 0.0);
    }

    #[test]
    fn snapshot_is_reproducible() {
        let mut a = ankara_session();
        a.load(gps_sets()).unwrap();
        a.set_cursor(epoch());

        let mut b = ankara_session();
        b.load(gps_sets()).unwrap();
        b.set_cursor(epoch());

        let (sa, sb) = (a.snapshot(), b.snapshot());
        assert_eq!(sa[0].position, sb[0].position);
        assert_eq!(sa[0].visibility, sb[0].visibility);
    }

    #[test]
    fn observer_change_recomputes_visibility() {
        let mut session = ankara_session();
        session.load(gps_sets()).unwrap();
        session.set_cursor(epoch());
        let before = session.snapshot()[0].visibility;

        session.set_observer(-33.9, 151.2).unwrap();
        let after = session.snapshot()[0].visibility;
        assert_ne!(before.azimuth_deg, after.azimuth_deg);
    }

    #[test]
    fn no_position_marks_stale_and_preserves_state() {
        let mut session = ankara_session();
        session.load(gps_sets()).unwrap();
        session.set_cursor(epoch());
        let before = session.snapshot()[0].clone();
        assert!(!before.stale);

        // Same name, corrupted lines: the reload keeps the computed state,
        // the next tick fails to propagate and flags the entry stale.
        session.load(broken_sets(GPS_NAME)).unwrap();
        session.recompute();

        let after = session.snapshot()[0].clone();
        assert!(after.stale);
        assert_eq!(after.position, before.position);
        assert_eq!(after.visibility, before.visibility);
    }

    #[test]
    fn reload_replaces_table_wholesale() {
        let mut session = ankara_session();
        session.load(gps_sets()).unwrap();
        session.set_cursor(epoch());

        session.load(broken_sets("OTHER SAT")).unwrap();
        assert_eq!(session.len(), 1);
        session.recompute();

        // The old satellite is gone entirely; the new one never computed a
        // position, so the snapshot holds no mix of old and new state.
        assert!(session.snapshot().is_empty());
        assert!(session.satellite(GPS_NAME).is_none());
        let other = session.satellite("OTHER SAT").unwrap();
        assert!(other.is_stale());
        assert_eq!(other.elements().constellation(), Constellation::Gps);
    }

    #[test]
    fn clear_empties_table() {
        let mut session = ankara_session();
        session.load(gps_sets()).unwrap();
        session.clear();
        assert!(session.is_empty());
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn date_minutes_cursor_form() {
        let mut session = ankara_session();
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        session.set_cursor_date_minutes(date, 12 * 60 + 30);
        assert_eq!(
            session.cursor(),
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap()
        );
    }
}
