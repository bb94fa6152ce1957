//! Typed valid/ready handshake streams.
//!
//! A stream carries [`Beat`]s from a [`SourcePort`] to a [`SinkPort`]. The
//! forward channel ([`Forward`]) and the backward channel ([`Backward`]) are
//! separate types; a beat moves only in a cycle where the source presents it
//! and the sink is ready. [`connect`] builds the [`StreamLink`] that resolves
//! that handshake and checks frame boundaries.

#![warn(missing_docs)]

pub mod beat;
pub mod bench;
pub mod error;
pub mod link;

pub use beat::{frame, Backward, Beat, Forward, PortIo, Transfer};
pub use bench::{StreamDriver, StreamMonitor};
pub use error::StreamError;
pub use link::{connect, FrameChecker, FrameViolation, SinkPort, SourcePort, StreamLink};
