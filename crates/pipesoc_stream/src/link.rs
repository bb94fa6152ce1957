//! Directional wiring between a source port and a sink port.
//!
//! [`connect`] is pure: it records which node drives which and returns a
//! [`StreamLink`] value. The link resolves one handshake per cycle of the
//! domain both ends run in, checks framing on every transfer and counts
//! transfers.

use crate::beat::{Backward, Beat, Forward, Transfer};
use crate::error::StreamError;
use std::fmt;
use std::marker::PhantomData;

/// The output port of a node. Only a source can drive a link.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourcePort {
    /// Owning node.
    pub node: String,
    /// Port name on the node.
    pub port: String,
}

impl SourcePort {
    /// Creates a source port.
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for SourcePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

/// The input port of a node. Only a sink can terminate a link.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SinkPort {
    /// Owning node.
    pub node: String,
    /// Port name on the node.
    pub port: String,
}

impl SinkPort {
    /// Creates a sink port.
    pub fn new(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for SinkPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

/// Tracks frame boundaries on one link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameChecker {
    open: bool,
}

impl FrameChecker {
    /// Returns true while a frame is open.
    pub fn in_frame(&self) -> bool {
        self.open
    }

    /// Accounts for one transferred beat.
    ///
    /// Returns the violation kind on error; the checker state is left
    /// unchanged in that case.
    pub fn check<T>(&mut self, beat: &Beat<T>) -> Result<(), FrameViolation> {
        match (self.open, beat.first) {
            (true, true) => return Err(FrameViolation::Interleaved),
            (false, false) => return Err(FrameViolation::Orphan),
            _ => {}
        }
        self.open = !beat.last;
        Ok(())
    }
}

/// Kind of framing violation found by [`FrameChecker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameViolation {
    /// `first` inside an open frame.
    Interleaved,
    /// Continuation beat outside any frame.
    Orphan,
}

/// A typed, directional connection from one source port to one sink port.
#[derive(Clone, Debug)]
pub struct StreamLink<T> {
    source: SourcePort,
    sink: SinkPort,
    frames: FrameChecker,
    transfers: u64,
    _payload: PhantomData<fn() -> T>,
}

/// Wires `source` to `sink`.
pub fn connect<T>(source: SourcePort, sink: SinkPort) -> StreamLink<T> {
    StreamLink {
        source,
        sink,
        frames: FrameChecker::default(),
        transfers: 0,
        _payload: PhantomData,
    }
}

impl<T: Clone> StreamLink<T> {
    /// Resolves one cycle: the beat moves iff the source presents it and the
    /// sink is ready.
    pub fn handshake(
        &mut self,
        forward: &Forward<T>,
        backward: Backward,
    ) -> Result<Transfer<T>, StreamError> {
        let beat = match forward.beat() {
            Some(beat) if backward.ready => beat,
            _ => return Ok(Transfer::none()),
        };
        self.frames.check(beat).map_err(|v| {
            tracing::warn!(link = %self, violation = ?v, "framing violation");
            match v {
                FrameViolation::Interleaved => StreamError::Interleaved {
                    link: self.to_string(),
                },
                FrameViolation::Orphan => StreamError::Orphan {
                    link: self.to_string(),
                },
            }
        })?;
        self.transfers += 1;
        Ok(Transfer {
            delivered: Some(beat.clone()),
            accepted: true,
        })
    }
}

impl<T> StreamLink<T> {
    /// Returns the driving port.
    pub fn source(&self) -> &SourcePort {
        &self.source
    }

    /// Returns the receiving port.
    pub fn sink(&self) -> &SinkPort {
        &self.sink
    }

    /// Returns the number of beats transferred so far.
    pub fn transfers(&self) -> u64 {
        self.transfers
    }

    /// Returns true while a frame is open on the link.
    pub fn in_frame(&self) -> bool {
        self.frames.in_frame()
    }

    /// Clears the framing state, as a domain reset does.
    pub fn reset(&mut self) {
        self.frames = FrameChecker::default();
    }
}

impl<T> fmt::Display for StreamLink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.sink)
    }
}
