//! Capture error types.

use pipesoc_common::BusError;

/// Errors raised while configuring, reading back or exporting a capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The selected groups contain no signals.
    #[error("capture has no signals")]
    EmptyRegistry,

    /// A group name does not exist.
    #[error("unknown signal group '{0}'")]
    UnknownGroup(String),

    /// A signal name does not exist in the registry.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// Two signals in the registry share a name.
    #[error("signal '{0}' registered twice")]
    DuplicateSignal(String),

    /// A signal width is zero or wider than 64 bits.
    #[error("signal '{signal}' has unsupported width {width}")]
    InvalidWidth {
        /// Signal name.
        signal: String,
        /// Declared width.
        width: u32,
    },

    /// The trigger value does not fit the trigger signal.
    #[error("trigger value {value:#x} does not fit {width}-bit signal '{signal}'")]
    TriggerValueTooWide {
        /// Trigger signal.
        signal: String,
        /// Requested value.
        value: u64,
        /// Signal width.
        width: u32,
    },

    /// Depth or pre-trigger settings are inconsistent.
    #[error("invalid capture settings: {0}")]
    Settings(String),

    /// Readback was attempted before the capture was complete.
    #[error("capture not complete (state {0})")]
    NotReady(String),

    /// The `STATE` register returned a code no capture state maps to.
    #[error("unknown capture state code {0}")]
    InvalidState(u32),

    /// Readback produced a partial sample.
    #[error("capture readback returned {words} words, not a multiple of {per_sample}")]
    Truncated {
        /// Words read.
        words: usize,
        /// Words per sample.
        per_sample: usize,
    },

    /// A control-bus access failed.
    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    /// An I/O error while writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
