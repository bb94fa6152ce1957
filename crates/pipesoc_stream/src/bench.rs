//! Test-bench ends of a stream: a queue-backed driver and a recording monitor.

use crate::beat::{Backward, Beat, Forward};
use std::collections::VecDeque;

/// Presents queued beats on a source port.
///
/// A beat, once presented, stays presented until accepted; `valid` may only
/// go low between beats.
#[derive(Clone, Debug)]
pub struct StreamDriver<T> {
    queue: VecDeque<Beat<T>>,
    holding: bool,
    sent: usize,
}

impl<T: Clone> StreamDriver<T> {
    /// Creates a driver with an empty queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            holding: false,
            sent: 0,
        }
    }

    /// Appends beats to the queue.
    pub fn extend(&mut self, beats: impl IntoIterator<Item = Beat<T>>) {
        self.queue.extend(beats);
    }

    /// Returns the forward channel for this cycle. `want_valid` is the
    /// pattern value; it is ignored while a presented beat is pending.
    pub fn forward(&mut self, want_valid: bool) -> Forward<T> {
        if !(self.holding || want_valid) {
            return Forward::idle();
        }
        match self.queue.front() {
            Some(beat) => {
                self.holding = true;
                Forward::present(beat.clone())
            }
            None => Forward::idle(),
        }
    }

    /// Completes the cycle. The front beat is dropped only if `accepted`.
    pub fn complete(&mut self, accepted: bool) {
        if accepted && self.queue.pop_front().is_some() {
            self.holding = false;
            self.sent += 1;
        }
    }

    /// Returns true once every queued beat has been accepted.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of beats accepted so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl<T: Clone> Default for StreamDriver<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives `ready` on a sink port and records every delivered beat.
#[derive(Clone, Debug)]
pub struct StreamMonitor<T> {
    received: Vec<Beat<T>>,
}

impl<T> StreamMonitor<T> {
    /// Creates an empty monitor.
    pub fn new() -> Self {
        Self {
            received: Vec::new(),
        }
    }

    /// Returns the backward channel for this cycle.
    pub fn backward(&self, ready: bool) -> Backward {
        Backward::new(ready)
    }

    /// Records the beat delivered this cycle, if any.
    pub fn observe(&mut self, delivered: Option<Beat<T>>) {
        if let Some(beat) = delivered {
            self.received.push(beat);
        }
    }

    /// Returns every recorded beat in arrival order.
    pub fn received(&self) -> &[Beat<T>] {
        &self.received
    }

    /// Returns the recorded payloads in arrival order.
    pub fn payloads(&self) -> impl Iterator<Item = &T> {
        self.received.iter().map(|b| &b.payload)
    }
}

impl<T> Default for StreamMonitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beat::frame;
    use crate::link::{connect, SinkPort, SourcePort};

    #[test]
    fn driver_holds_until_accepted() {
        let mut driver = StreamDriver::new();
        driver.extend(frame([10u8, 11]));

        assert!(driver.forward(true).valid());
        driver.complete(false);
        // Still presenting although the pattern dropped valid.
        let fwd = driver.forward(false);
        assert_eq!(fwd.beat().map(|b| b.payload), Some(10));
        driver.complete(true);

        assert!(!driver.forward(false).valid());
        assert_eq!(driver.forward(true).beat().map(|b| b.payload), Some(11));
        driver.complete(true);
        assert!(driver.is_idle());
        assert_eq!(driver.sent(), 2);
    }

    #[test]
    fn driver_and_monitor_over_link() {
        let mut link = connect(SourcePort::new("tb", "source"), SinkPort::new("dut", "sink"));
        let mut driver = StreamDriver::new();
        let mut monitor = StreamMonitor::new();
        driver.extend(frame(0u16..8));

        let mut cycle = 0;
        while !driver.is_idle() {
            let fwd = driver.forward(cycle % 3 != 0);
            let bwd = monitor.backward(cycle % 2 == 0);
            let t = link.handshake(&fwd, bwd).unwrap();
            driver.complete(t.accepted);
            monitor.observe(t.delivered);
            cycle += 1;
            assert!(cycle < 100);
        }
        assert_eq!(monitor.payloads().copied().collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
        assert_eq!(link.transfers(), 8);
    }
}
