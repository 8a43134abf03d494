//! Two-line element (TLE) set parsing for the GNSS constellations.
//!
//! Turns raw three-line groups (name, line 1, line 2) from a CelesTrak-style
//! feed into validated element sets tagged with their constellation.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constellation {
    Gps,
    Glonass,
    Galileo,
    Beidou,
}

impl Constellation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gps => "GPS",
            Self::Glonass => "GLONASS",
            Self::Galileo => "Galileo",
            Self::Beidou => "BeiDou",
        }
    }

    /// CelesTrak GP query group for this constellation.
    pub fn group(&self) -> &'static str {
        match self {
            Self::Gps => "gps-ops",
            Self::Glonass => "glo-ops",
            Self::Galileo => "galileo",
            Self::Beidou => "beidou",
        }
    }

    pub const ALL: [Constellation; 4] = [
        Self::Gps,
        Self::Glonass,
        Self::Galileo,
        Self::Beidou,
    ];
}

/// A validated element set. Only the parser constructs these, so holding one
/// implies both lines passed the format patterns.
#[derive(Clone, Debug, Serialize)]
pub struct ElementSet {
    name: String,
    line1: String,
    line2: String,
    constellation: Constellation,
}

impl ElementSet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    pub fn constellation(&self) -> Constellation {
        self.constellation
    }
}

static LINE1_PATTERN: OnceLock<Regex> = OnceLock::new();
static LINE2_PATTERN: OnceLock<Regex> = OnceLock::new();

fn line1_pattern() -> &'static Regex {
    LINE1_PATTERN.get_or_init(|| Regex::new(r"^1 [0-9 ]{5}[A-Z] .*$").unwrap())
}

fn line2_pattern() -> &'static Regex {
    LINE2_PATTERN.get_or_init(|| Regex::new(r"^2 [0-9 ]{5} .*$").unwrap())
}

pub(crate) fn lines_valid(line1: &str, line2: &str) -> bool {
    line1_pattern().is_match(line1) && line2_pattern().is_match(line2)
}

/// Parses raw feed text into element sets for one constellation.
///
/// Lines are trimmed and empties discarded before grouping by three. A group
/// whose lines fail the format patterns is dropped, as is a trailing group
/// with fewer than three lines. Best effort: feed corruption never errors.
pub fn parse_element_sets(raw: &str, constellation: Constellation) -> Vec<ElementSet> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut sets = Vec::new();
    for group in lines.chunks_exact(3) {
        let (name, line1, line2) = (group[0], group[1], group[2]);
        if !lines_valid(line1, line2) {
            log::debug!("dropping malformed element group {:?}", name);
            continue;
        }
        sets.push(ElementSet {
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            constellation,
        });
    }
    sets
}
