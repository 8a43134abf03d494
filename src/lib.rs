//! GNSS constellation tracking engine.
//!
//! Parses two-line element feeds for GPS, GLONASS, Galileo and BeiDou,
//! propagates each satellite with SGP4 for an arbitrary instant, converts to
//! geodetic coordinates and computes observer-relative visibility geometry.
//! Rendering, UI controls and scheduling are external collaborators driving
//! the [`session::TrackingSession`] tick and snapshot operations.

pub mod elements;
pub mod error;
pub mod fetch;
pub mod geodetic;
pub mod propagator;
pub mod session;
pub mod visibility;

pub use elements::{parse_element_sets, Constellation, ElementSet};
pub use error::TrackError;
pub use geodetic::GeodeticPosition;
pub use session::{ObserverPosition, SnapshotEntry, TrackingSession};
pub use visibility::VisibilityResult;
