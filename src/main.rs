//! Console driver: fetches the four GNSS feeds, then prints a visibility
//! table for the observer once per second. Stands in for the map/table UI the
//! engine is designed to feed.
//!
//! Usage: gnss-track [latitude longitude] [--json]

use std::time::Duration;

use chrono::Utc;

use gnss_track::fetch;
use gnss_track::session::{SnapshotEntry, TrackingSession};

const DEFAULT_LATITUDE: f64 = 39.9334;
const DEFAULT_LONGITUDE: f64 = 32.8597;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

fn format_azimuth(azimuth_deg: f64) -> String {
    let index = (azimuth_deg / 22.5).round() as usize % 16;
    format!("{:.1}° ({})", azimuth_deg, COMPASS_POINTS[index])
}

fn print_table(entries: &[SnapshotEntry]) {
    println!(
        "{:<12} {:<24} {:<10} {:>10} {:>14} {:>12}",
        "Status", "Satellite", "System", "Elev", "Azimuth", "Dist km"
    );
    for entry in entries {
        let status = if entry.stale {
            "Stale"
        } else if entry.visibility.visible {
            "Visible"
        } else {
            "Not Visible"
        };
        println!(
            "{:<12} {:<24} {:<10} {:>9.1}° {:>14} {:>12.1}",
            status,
            entry.name,
            entry.constellation.label(),
            entry.visibility.elevation_deg,
            format_azimuth(entry.visibility.azimuth_deg),
            entry.visibility.distance_km,
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut json = false;
    let mut coords = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            coords.push(arg.parse::<f64>()?);
        }
    }
    let latitude = coords.first().copied().unwrap_or(DEFAULT_LATITUDE);
    let longitude = coords.get(1).copied().unwrap_or(DEFAULT_LONGITUDE);

    let mut session = TrackingSession::new(latitude, longitude)?;
    let sets = fetch::load_all(fetch::fetch_group)?;
    session.load(sets)?;
    log::info!(
        "tracking {} satellites for observer ({}, {})",
        session.len(),
        latitude,
        longitude
    );

    loop {
        session.set_cursor(Utc::now());
        let snapshot = session.snapshot();
        if json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            println!("\n{} UTC", session.cursor().format("%Y-%m-%d %H:%M:%S"));
            print_table(&snapshot);
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}
