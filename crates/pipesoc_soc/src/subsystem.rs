//! The seams the assembler composes: subsystems, the link layer, and the
//! serializer's wire side.
//!
//! Every model is Moore-style: `source`, `sink` and `ready` reflect state
//! registered on the previous edge, so all handshakes of a cycle can be
//! resolved before any model is clocked.

use pipesoc_config::ConnectorPins;
use pipesoc_stream::{Backward, Beat, Forward, PortIo};

/// Payload carried by every stream in the system: one 32-bit PIPE symbol word.
pub type Symbol = u32;

/// A block with a reset input, a readiness output, one inbound and one
/// outbound stream.
pub trait Subsystem {
    /// Instance name used in port names and logs.
    fn name(&self) -> &str;

    /// Readiness status output.
    fn ready(&self) -> bool;

    /// Forward channel of the outbound stream.
    fn source(&self) -> Forward<Symbol>;

    /// Backward channel of the inbound stream.
    fn sink(&self) -> Backward;

    /// Rising edge of the subsystem's domain. `reset` is the synchronized
    /// domain reset for this edge.
    fn clock(&mut self, io: PortIo<Symbol>, reset: bool);

    /// Beats accepted from the outbound stream since construction.
    fn beats_sent(&self) -> u64 {
        0
    }
}

/// The serializer: a subsystem whose inbound stream is the transmit lane and
/// whose outbound stream is the receive lane.
pub trait Serializer: Subsystem {
    /// Binds the transceiver channel and pins chosen by the board profile.
    fn bind(&mut self, pins: ConnectorPins);

    /// Returns the bound pins.
    fn pins(&self) -> Option<&ConnectorPins>;

    /// Beats arriving from the far end of the cable.
    fn receive(&mut self, beats: Vec<Beat<Symbol>>);

    /// Takes every beat transmitted onto the cable so far.
    fn take_transmitted(&mut self) -> Vec<Beat<Symbol>>;
}

/// The link-training layer. It has a port pair facing the serializer and a
/// port pair facing the protocol core.
pub trait LinkLayer {
    /// True once training has completed and the link carries data.
    fn ready(&self) -> bool;

    /// Forward channel towards the serializer's transmit lane.
    fn phy_source(&self) -> Forward<Symbol>;

    /// Backward channel of the serializer's receive lane.
    fn phy_sink(&self) -> Backward;

    /// Forward channel towards the core.
    fn core_source(&self) -> Forward<Symbol>;

    /// Backward channel of the core's outbound stream.
    fn core_sink(&self) -> Backward;

    /// Rising edge of the link domain. `phy_ready` is the serializer's
    /// readiness; training starts from it.
    fn clock(&mut self, phy: PortIo<Symbol>, core: PortIo<Symbol>, reset: bool, phy_ready: bool);
}
