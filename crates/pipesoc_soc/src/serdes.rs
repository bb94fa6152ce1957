//! Behavioral serializer: locks a fixed number of cycles after reset, then
//! moves beats between the cable and the link layer.

use crate::subsystem::{Serializer, Subsystem, Symbol};
use pipesoc_config::ConnectorPins;
use pipesoc_stream::{Backward, Beat, Forward, PortIo};
use std::collections::VecDeque;

/// Cycles the reference serializer needs to lock after reset.
pub const SERDES_LOCK_CYCLES: u32 = 64;

/// Reference serializer model.
#[derive(Clone, Debug)]
pub struct SerdesModel {
    pins: Option<ConnectorPins>,
    lock_cycles: u32,
    remaining: u32,
    ready: bool,
    rx_wire: VecDeque<Beat<Symbol>>,
    tx_wire: Vec<Beat<Symbol>>,
}

impl SerdesModel {
    /// Creates an unlocked serializer that locks `lock_cycles` edges after
    /// reset is released.
    pub fn new(lock_cycles: u32) -> Self {
        Self {
            pins: None,
            lock_cycles,
            remaining: lock_cycles,
            ready: false,
            rx_wire: VecDeque::new(),
            tx_wire: Vec::new(),
        }
    }

    /// Returns the number of beats waiting on the receive side of the cable.
    pub fn pending_rx(&self) -> usize {
        self.rx_wire.len()
    }

    /// Drops the rest of a frame whose head already left the receive lane.
    /// The lane then starts on a frame boundary.
    fn discard_partial_frame(&mut self) {
        let partial = self.rx_wire.iter().take_while(|beat| !beat.first).count();
        if partial > 0 {
            tracing::debug!(beats = partial, "partial frame discarded");
            self.rx_wire.drain(..partial);
        }
    }
}

impl Default for SerdesModel {
    fn default() -> Self {
        Self::new(SERDES_LOCK_CYCLES)
    }
}

impl Subsystem for SerdesModel {
    fn name(&self) -> &str {
        "serdes"
    }

    fn ready(&self) -> bool {
        self.ready
    }

    fn source(&self) -> Forward<Symbol> {
        if !self.ready {
            return Forward::idle();
        }
        self.rx_wire.front().cloned().into()
    }

    fn sink(&self) -> Backward {
        Backward::new(self.ready)
    }

    fn clock(&mut self, io: PortIo<Symbol>, reset: bool) {
        if reset {
            self.remaining = self.lock_cycles;
            self.ready = false;
            self.discard_partial_frame();
            return;
        }
        if io.outbound_accepted {
            self.rx_wire.pop_front();
        }
        if let Some(beat) = io.inbound {
            self.tx_wire.push(beat);
        }
        if !self.ready {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.ready = true;
                tracing::info!(
                    channel = ?self.pins.map(|p| p.channel),
                    "serializer ready"
                );
            }
        }
    }
}

impl Serializer for SerdesModel {
    fn bind(&mut self, pins: ConnectorPins) {
        tracing::debug!(
            connector = %pins.connector,
            channel = pins.channel,
            tx_p = pins.tx.p,
            rx_p = pins.rx.p,
            "serializer bound"
        );
        self.pins = Some(pins);
    }

    fn pins(&self) -> Option<&ConnectorPins> {
        self.pins.as_ref()
    }

    fn receive(&mut self, beats: Vec<Beat<Symbol>>) {
        self.rx_wire.extend(beats);
    }

    fn take_transmitted(&mut self) -> Vec<Beat<Symbol>> {
        std::mem::take(&mut self.tx_wire)
    }
}
