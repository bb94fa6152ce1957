//! Assembly and simulation error types.

use pipesoc_clock::ClockError;
use pipesoc_config::ConfigError;
use pipesoc_scope::CaptureError;
use pipesoc_stream::StreamError;

/// Errors that abort assembly. Nothing is instantiated when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// The configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The clock plan could not be solved.
    #[error("clock planning error: {0}")]
    Clock(#[from] ClockError),

    /// The debug capture could not be configured.
    #[error("debug capture error: {0}")]
    Capture(#[from] CaptureError),

    /// A domain the subsystems run in is missing from the clock plan.
    #[error("clock plan has no '{0}' domain")]
    MissingDomain(String),
}

/// Errors raised while stepping an assembled system.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A subsystem model violated the stream framing rules.
    #[error("stream protocol violation at {time_fs} fs: {source}")]
    Stream {
        /// Time of the offending edge in femtoseconds.
        time_fs: u64,
        /// The violation.
        source: StreamError,
    },

    /// The system has no clock to advance.
    #[error("no clock domains to schedule")]
    NoClocks,
}
