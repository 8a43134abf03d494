//! Element-set feed loading.
//!
//! One HTTP fetch per constellation against the CelesTrak GP endpoint, with
//! the aggregation policy from the tracking design: a failed or empty feed
//! contributes zero sets, and only all four coming back empty is an error.

use crate::elements::{parse_element_sets, Constellation, ElementSet};
use crate::error::TrackError;

pub const CELESTRAK_GP_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// Fetches the raw element text for one constellation.
pub fn fetch_group(constellation: Constellation) -> Result<String, String> {
    let url = format!("{}?GROUP={}", CELESTRAK_GP_URL, constellation.group());
    let response = ureq::get(&url)
        .call()
        .map_err(|e| format!("HTTP error: {}", e))?;
    response
        .into_string()
        .map_err(|e| format!("Read error: {}", e))
}

/// Loads and parses every constellation through the given fetch function.
///
/// The fetch function is injected so drivers use [`fetch_group`] while tests
/// supply canned feeds. Per-constellation failures degrade to zero sets for
/// that constellation; `NoElementSetsLoaded` fires only when nothing at all
/// parsed across the four feeds.
pub fn load_all<F>(mut fetch: F) -> Result<Vec<ElementSet>, TrackError>
where
    F: FnMut(Constellation) -> Result<String, String>,
{
    let mut sets = Vec::new();
    for constellation in Constellation::ALL {
        match fetch(constellation) {
            Ok(raw) => {
                let parsed = parse_element_sets(&raw, constellation);
                log::info!("{}: {} element sets", constellation.label(), parsed.len());
                sets.extend(parsed);
            }
            Err(e) => {
                log::warn!("{} feed failed: {}", constellation.label(), e);
            }
        }
    }
    if sets.is_empty() {
        return Err(TrackError::NoElementSetsLoaded);
    }
    Ok(sets)
}
