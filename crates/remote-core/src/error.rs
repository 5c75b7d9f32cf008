//! Error types surfaced by the sans-I/O core.

/// Errors the driver engine surfaces to its host.
///
/// Every other failure mode described by the wire protocol — transport
/// disconnects, send failures, malformed frames, asset load failures — is
/// recovered locally by the engine or its async wrapper and never reaches
/// this type. Only configuration is rejected outright, at construction
/// time, before any connection is attempted.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The supplied [`crate::config::EngineConfig`] was missing a field its
    /// transport kind requires, or named an invalid combination.
    #[error("invalid transport configuration: {0}")]
    ConfigInvalid(String),
}
