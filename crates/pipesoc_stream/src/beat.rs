//! Beats and the two channels of a handshake stream.

/// One unit of data on a stream with its frame delimiters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Beat<T> {
    /// Payload carried by the beat.
    pub payload: T,
    /// Opens a frame.
    pub first: bool,
    /// Closes a frame.
    pub last: bool,
}

impl<T> Beat<T> {
    /// Creates a beat with explicit frame flags.
    pub fn new(payload: T, first: bool, last: bool) -> Self {
        Self {
            payload,
            first,
            last,
        }
    }

    /// Creates a single-beat frame.
    pub fn single(payload: T) -> Self {
        Self::new(payload, true, true)
    }
}

/// Splits `payloads` into one frame: the first beat opens it, the last closes it.
pub fn frame<T>(payloads: impl IntoIterator<Item = T>) -> Vec<Beat<T>> {
    let mut beats: Vec<Beat<T>> = payloads
        .into_iter()
        .map(|payload| Beat::new(payload, false, false))
        .collect();
    if let Some(head) = beats.first_mut() {
        head.first = true;
    }
    if let Some(tail) = beats.last_mut() {
        tail.last = true;
    }
    beats
}

/// Source-to-sink half of a stream: `valid` and the beat it qualifies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forward<T> {
    beat: Option<Beat<T>>,
}

impl<T> Forward<T> {
    /// Nothing presented this cycle.
    pub fn idle() -> Self {
        Self { beat: None }
    }

    /// Presents `beat` this cycle.
    pub fn present(beat: Beat<T>) -> Self {
        Self { beat: Some(beat) }
    }

    /// Returns the `valid` wire.
    pub fn valid(&self) -> bool {
        self.beat.is_some()
    }

    /// Returns the presented beat, if valid.
    pub fn beat(&self) -> Option<&Beat<T>> {
        self.beat.as_ref()
    }
}

impl<T> Default for Forward<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> From<Option<Beat<T>>> for Forward<T> {
    fn from(beat: Option<Beat<T>>) -> Self {
        Self { beat }
    }
}

/// Sink-to-source half of a stream: the `ready` wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Backward {
    /// The sink accepts a beat this cycle.
    pub ready: bool,
}

impl Backward {
    /// Creates a backward channel.
    pub fn new(ready: bool) -> Self {
        Self { ready }
    }
}

/// Outcome of one handshake cycle as seen by each end of a link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer<T> {
    /// Beat handed to the sink. Present only on a transfer cycle.
    pub delivered: Option<Beat<T>>,
    /// Seen by the source: its beat was taken.
    pub accepted: bool,
}

impl<T> Transfer<T> {
    /// A cycle with no transfer.
    pub fn none() -> Self {
        Self {
            delivered: None,
            accepted: false,
        }
    }

    /// Returns true if a beat moved this cycle.
    pub fn happened(&self) -> bool {
        self.accepted
    }
}

/// What a node sees of its two stream ports in one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortIo<T> {
    /// Beat delivered to the node's sink port, if any.
    pub inbound: Option<Beat<T>>,
    /// The node's source port had its beat accepted.
    pub outbound_accepted: bool,
}

impl<T> PortIo<T> {
    /// A cycle with nothing moving on either port.
    pub fn quiet() -> Self {
        Self {
            inbound: None,
            outbound_accepted: false,
        }
    }
}

impl<T> Default for PortIo<T> {
    fn default() -> Self {
        Self::quiet()
    }
}
