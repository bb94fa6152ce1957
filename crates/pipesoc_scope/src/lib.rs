//! Non-intrusive debug capture.
//!
//! Signals are grouped and laid out by a [`SignalRegistry`]. A
//! [`CaptureBuffer`] stores registry samples once triggered and halts when
//! full; [`CaptureCsr`] exposes it as control registers and
//! [`CaptureReader`] drains it from the host side. The capture only reads
//! the values it is offered and never drives the logic it observes.

#![warn(missing_docs)]

pub mod artifact;
pub mod buffer;
pub mod csr;
pub mod error;
pub mod reader;
pub mod signal;
pub mod vcd;

pub use artifact::AnalyzerDescription;
pub use buffer::{CaptureBuffer, CaptureSettings, CaptureState, Trigger};
pub use csr::CaptureCsr;
pub use error::CaptureError;
pub use reader::CaptureReader;
pub use signal::{ProbeSignal, Sample, SignalEntry, SignalGroup, SignalRegistry, MAX_SIGNAL_WIDTH};
pub use vcd::VcdWriter;
