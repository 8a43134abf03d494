use thiserror::Error;

/// Errors surfaced to the human-facing layer. Everything else (malformed
/// element groups, per-satellite propagation failures) is absorbed by policy
/// inside the engine and only logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("No GNSS satellite data received")]
    NoElementSetsLoaded,
    #[error("{0}")]
    InvalidCoordinates(String),
}
