//! SGP4 propagation adapter.
//!
//! Rebuilds the sgp4 context from the raw element lines on every call, so the
//! result is a pure function of (element set, instant) and nothing leaks
//! between satellites.

use chrono::{DateTime, Utc};
use sgp4::Constants;

use crate::elements::ElementSet;

pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Earth-Centered-Inertial state in kilometers and kilometers per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EciPosition {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

pub fn datetime_to_minutes(dt: DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64 / 60_000.0
}

/// Evaluates the orbital model for one element set at the given instant.
///
/// `None` means no position is attributable for this instant: the lines did
/// not parse as a full TLE, the elements are geometrically degenerate, or the
/// model diverged. Callers skip the satellite for the tick rather than abort.
pub fn propagate(set: &ElementSet, at: DateTime<Utc>) -> Option<EciPosition> {
    let tle = format!("{}\n{}\n{}", set.name(), set.line1(), set.line2());
    let elements = match sgp4::parse_3les(&tle) {
        Ok(v) => v.into_iter().next()?,
        Err(e) => {
            log::debug!("element lines for {:?} rejected by sgp4: {}", set.name(), e);
            return None;
        }
    };
    let constants = match Constants::from_elements(&elements) {
        Ok(c) => c,
        Err(e) => {
            log::debug!("degenerate elements for {:?}: {}", set.name(), e);
            return None;
        }
    };

    let epoch_minutes = datetime_to_minutes(elements.datetime.and_utc());
    let minutes_since_epoch = datetime_to_minutes(at) - epoch_minutes;
    match constants.propagate(sgp4::MinutesSinceEpoch(minutes_since_epoch)) {
        Ok(prediction) => Some(EciPosition {
            position: prediction.position,
            velocity: prediction.velocity,
        }),
        Err(e) => {
            log::debug!("propagation failed for {:?}: {}", set.name(), e);
            None
        }
    }
}
