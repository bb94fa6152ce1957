//! Reference protocol core: returns every received beat to the link.

use crate::subsystem::{Subsystem, Symbol};
use pipesoc_stream::{Backward, Beat, Forward, PortIo};
use std::collections::VecDeque;

const BUFFER_DEPTH: usize = 2;

/// Loopback core with a two-entry buffer.
#[derive(Clone, Debug)]
pub struct EchoCore {
    buffer: VecDeque<Beat<Symbol>>,
    in_reset: bool,
    echoed: u64,
}

impl EchoCore {
    /// Creates a core held in reset.
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(BUFFER_DEPTH),
            in_reset: true,
            echoed: 0,
        }
    }

    /// Returns the number of beats sent back so far.
    pub fn echoed(&self) -> u64 {
        self.echoed
    }
}

impl Default for EchoCore {
    fn default() -> Self {
        Self::new()
    }
}

impl Subsystem for EchoCore {
    fn name(&self) -> &str {
        "core"
    }

    fn ready(&self) -> bool {
        !self.in_reset
    }

    fn source(&self) -> Forward<Symbol> {
        self.buffer.front().cloned().into()
    }

    fn sink(&self) -> Backward {
        Backward::new(!self.in_reset && self.buffer.len() < BUFFER_DEPTH)
    }

    fn beats_sent(&self) -> u64 {
        self.echoed
    }

    fn clock(&mut self, io: PortIo<Symbol>, reset: bool) {
        if reset {
            self.buffer.clear();
            self.in_reset = true;
            return;
        }
        self.in_reset = false;
        if io.outbound_accepted && self.buffer.pop_front().is_some() {
            self.echoed += 1;
        }
        if let Some(beat) = io.inbound {
            self.buffer.push_back(beat);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_in_reset() {
        let mut core = EchoCore::new();
        assert!(!core.ready());
        assert!(!core.sink().ready);
        core.clock(PortIo::quiet(), true);
        assert!(!core.ready());
        core.clock(PortIo::quiet(), false);
        assert!(core.ready());
        assert!(core.sink().ready);
    }

    #[test]
    fn echoes_in_order() {
        let mut core = EchoCore::new();
        core.clock(PortIo::quiet(), false);
        core.clock(
            PortIo {
                inbound: Some(Beat::new(1, true, false)),
                outbound_accepted: false,
            },
            false,
        );
        core.clock(
            PortIo {
                inbound: Some(Beat::new(2, false, true)),
                outbound_accepted: false,
            },
            false,
        );
        assert!(!core.sink().ready);
        assert_eq!(core.source().beat(), Some(&Beat::new(1, true, false)));
        core.clock(
            PortIo {
                inbound: None,
                outbound_accepted: true,
            },
            false,
        );
        assert_eq!(core.source().beat(), Some(&Beat::new(2, false, true)));
        assert_eq!(core.echoed(), 1);
        assert_eq!(core.beats_sent(), 1);
    }

    #[test]
    fn reset_discards_buffer() {
        let mut core = EchoCore::new();
        core.clock(PortIo::quiet(), false);
        core.clock(
            PortIo {
                inbound: Some(Beat::single(5)),
                outbound_accepted: false,
            },
            false,
        );
        core.clock(PortIo::quiet(), true);
        assert!(!core.source().valid());
    }
}
