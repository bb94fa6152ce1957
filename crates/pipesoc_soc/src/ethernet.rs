//! Ethernet control bridge.
//!
//! Gives the host a second path onto the control bus over UDP. The packet
//! side faces the Ethernet PHY, which is outside the model, so both of its
//! streams stay idle; the bridge contributes its identity registers and a
//! readiness output.

use crate::subsystem::{Subsystem, Symbol};
use pipesoc_config::EthernetConfig;
use pipesoc_stream::{Backward, Forward, PortIo};
use std::net::Ipv4Addr;

/// Register names of the `etherbone` endpoint in offset order.
pub const REGISTERS: [&str; 4] = ["ip_address", "mac_high", "mac_low", "ready"];

/// Ethernet-to-bus bridge.
#[derive(Clone, Debug)]
pub struct EthernetControl {
    ip_address: Ipv4Addr,
    mac_address: u64,
    in_reset: bool,
}

impl EthernetControl {
    /// Creates a bridge answering on the configured addresses.
    pub fn new(config: &EthernetConfig) -> Self {
        Self {
            ip_address: config.ip_address,
            mac_address: config.mac_address & 0xffff_ffff_ffff,
            in_reset: true,
        }
    }

    /// Returns the bridge IP address.
    pub fn ip_address(&self) -> Ipv4Addr {
        self.ip_address
    }

    /// Reads the endpoint register at word `offset`.
    pub fn read(&self, offset: u32) -> Option<u32> {
        match offset {
            0 => Some(u32::from(self.ip_address)),
            1 => Some((self.mac_address >> 32) as u32),
            2 => Some(self.mac_address as u32),
            3 => Some(u32::from(self.ready())),
            _ => None,
        }
    }
}

impl Subsystem for EthernetControl {
    fn name(&self) -> &str {
        "etherbone"
    }

    fn ready(&self) -> bool {
        !self.in_reset
    }

    fn source(&self) -> Forward<Symbol> {
        Forward::idle()
    }

    fn sink(&self) -> Backward {
        Backward::new(false)
    }

    fn clock(&mut self, _io: PortIo<Symbol>, reset: bool) {
        if self.in_reset != reset {
            tracing::debug!(ip = %self.ip_address, ready = !reset, "ethernet bridge");
        }
        self.in_reset = reset;
    }
}
