//! The host control bus: word-addressed 32-bit register access.

/// Errors returned by a control-bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// No endpoint register decodes the address.
    #[error("unmapped bus address {addr:#06x}")]
    Unmapped {
        /// Byte address of the access.
        addr: u32,
    },

    /// The address is not aligned to a 32-bit register.
    #[error("misaligned bus address {addr:#06x}")]
    Misaligned {
        /// Byte address of the access.
        addr: u32,
    },
}

/// Register access as seen from the host.
///
/// Addresses are byte addresses; registers are 32 bits wide at a 4-byte
/// stride.
pub trait ControlBus {
    /// Reads the register at `addr`.
    fn read(&mut self, addr: u32) -> Result<u32, BusError>;

    /// Writes `value` to the register at `addr`.
    fn write(&mut self, addr: u32, value: u32) -> Result<(), BusError>;
}
