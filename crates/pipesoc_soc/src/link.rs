//! Behavioral link layer: trains once the serializer is ready, then relays
//! beats in both directions through two-entry buffers.

use crate::subsystem::{LinkLayer, Symbol};
use pipesoc_stream::{Backward, Beat, Forward, PortIo};
use std::collections::VecDeque;

/// Cycles of training before the reference link reports ready.
pub const LINK_TRAINING_CYCLES: u32 = 32;

const BUFFER_DEPTH: usize = 2;

/// Link training state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    /// Waiting for the serializer.
    Disabled,
    /// Training with the far end.
    Training,
    /// Trained; data flows.
    Active,
}

/// Reference link-layer model.
#[derive(Clone, Debug)]
pub struct LinkModel {
    training_cycles: u32,
    remaining: u32,
    state: LinkState,
    to_core: VecDeque<Beat<Symbol>>,
    to_phy: VecDeque<Beat<Symbol>>,
}

impl LinkModel {
    /// Creates a disabled link that trains for `training_cycles` edges.
    pub fn new(training_cycles: u32) -> Self {
        Self {
            training_cycles,
            remaining: training_cycles,
            state: LinkState::Disabled,
            to_core: VecDeque::with_capacity(BUFFER_DEPTH),
            to_phy: VecDeque::with_capacity(BUFFER_DEPTH),
        }
    }

    /// Returns the training state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    fn disable(&mut self) {
        self.state = LinkState::Disabled;
        self.remaining = self.training_cycles;
        self.to_core.clear();
        self.to_phy.clear();
    }

    fn active(&self) -> bool {
        self.state == LinkState::Active
    }
}

impl Default for LinkModel {
    fn default() -> Self {
        Self::new(LINK_TRAINING_CYCLES)
    }
}

impl LinkLayer for LinkModel {
    fn ready(&self) -> bool {
        self.active()
    }

    fn phy_source(&self) -> Forward<Symbol> {
        if !self.active() {
            return Forward::idle();
        }
        self.to_phy.front().cloned().into()
    }

    fn phy_sink(&self) -> Backward {
        Backward::new(self.active() && self.to_core.len() < BUFFER_DEPTH)
    }

    fn core_source(&self) -> Forward<Symbol> {
        if !self.active() {
            return Forward::idle();
        }
        self.to_core.front().cloned().into()
    }

    fn core_sink(&self) -> Backward {
        Backward::new(self.active() && self.to_phy.len() < BUFFER_DEPTH)
    }

    fn clock(&mut self, phy: PortIo<Symbol>, core: PortIo<Symbol>, reset: bool, phy_ready: bool) {
        if reset {
            self.disable();
            return;
        }
        if !phy_ready {
            if self.active() {
                tracing::warn!("link lost: serializer not ready");
            }
            self.disable();
            return;
        }
        match self.state {
            LinkState::Disabled => {
                self.state = LinkState::Training;
                self.remaining = self.training_cycles;
                tracing::debug!(cycles = self.training_cycles, "link training started");
            }
            LinkState::Training => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.state = LinkState::Active;
                    tracing::info!("link ready");
                }
            }
            LinkState::Active => {
                if phy.outbound_accepted {
                    self.to_phy.pop_front();
                }
                if core.outbound_accepted {
                    self.to_core.pop_front();
                }
                if let Some(beat) = phy.inbound {
                    self.to_core.push_back(beat);
                }
                if let Some(beat) = core.inbound {
                    self.to_phy.push_back(beat);
                }
            }
        }
    }
}
