//! Control-bus address map.
//!
//! Each endpoint owns a 0x800-byte region, allocated in registration order
//! from address zero. Registers are 32 bits wide at a 4-byte stride; an
//! address past an endpoint's last register is unmapped.

use pipesoc_common::{BusError, EndpointId};
use std::fmt::Write as _;

/// Bytes per endpoint region.
pub const REGION_SIZE: u32 = 0x800;

/// Bytes per register.
pub const REGISTER_STRIDE: u32 = 4;

/// One endpoint's region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// Endpoint id.
    pub id: EndpointId,
    /// Endpoint name.
    pub name: &'static str,
    /// Base byte address.
    pub base: u32,
    /// Register names in offset order.
    pub registers: &'static [&'static str],
}

impl Endpoint {
    /// Returns the byte address of the named register.
    pub fn address_of(&self, register: &str) -> Option<u32> {
        self.registers
            .iter()
            .position(|r| *r == register)
            .map(|i| self.base + i as u32 * REGISTER_STRIDE)
    }
}

/// The endpoints registered on the control bus.
#[derive(Clone, Debug, Default)]
pub struct CsrMap {
    endpoints: Vec<Endpoint>,
}

impl CsrMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next region to `name`.
    pub fn register(
        &mut self,
        name: &'static str,
        registers: &'static [&'static str],
    ) -> EndpointId {
        let id = EndpointId::from_raw(self.endpoints.len() as u32);
        let base = id.as_raw() * REGION_SIZE;
        tracing::debug!(endpoint = name, base, registers = registers.len(), "endpoint registered");
        self.endpoints.push(Endpoint {
            id,
            name,
            base,
            registers,
        });
        id
    }

    /// Returns the registered endpoints in address order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Returns the named endpoint.
    pub fn endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Decodes a byte address into an endpoint and register offset.
    pub fn decode(&self, addr: u32) -> Result<(EndpointId, u32), BusError> {
        if addr % REGISTER_STRIDE != 0 {
            return Err(BusError::Misaligned { addr });
        }
        let endpoint = self
            .endpoints
            .get((addr / REGION_SIZE) as usize)
            .ok_or(BusError::Unmapped { addr })?;
        let offset = (addr - endpoint.base) / REGISTER_STRIDE;
        if offset as usize >= endpoint.registers.len() {
            return Err(BusError::Unmapped { addr });
        }
        Ok((endpoint.id, offset))
    }

    /// Renders `csr.csv`: one `csr_base` row per endpoint followed by a
    /// `csr_register` row per register.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for ep in &self.endpoints {
            let _ = writeln!(out, "csr_base,{},0x{:08x}", ep.name, ep.base);
        }
        for ep in &self.endpoints {
            for (i, reg) in ep.registers.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "csr_register,{}_{},0x{:08x}",
                    ep.name,
                    reg,
                    ep.base + i as u32 * REGISTER_STRIDE
                );
            }
        }
        out
    }
}
