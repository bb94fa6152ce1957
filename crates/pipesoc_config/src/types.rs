//! Configuration types deserialized from `pipesoc.toml`.

use pipesoc_common::ResetPolicy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// The top-level SoC configuration parsed from `pipesoc.toml`.
///
/// Every section is optional; a missing section takes the defaults of the
/// reference design (Versa ECP5, PCIe connector, no optional subsystems).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocConfig {
    /// Board, connector and optional subsystem selection.
    pub soc: SocSection,
    /// Power-on reset and synchronizer settings.
    pub reset: ResetConfig,
    /// Clock domain overrides and additional domains, keyed by domain name.
    pub clocks: BTreeMap<String, ClockDef>,
    /// Ethernet control bridge settings.
    pub ethernet: EthernetConfig,
    /// Debug capture settings.
    pub capture: CaptureConfig,
}

/// Board and subsystem selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocSection {
    /// Board profile name (e.g. "versa_ecp5", "kc705").
    pub board: String,
    /// Connector carrying the serializer lanes (e.g. "pcie", "sma").
    pub connector: String,
    /// Attach the Ethernet control bridge.
    pub ethernet_control: bool,
    /// Attach the debug capture buffer.
    pub debug_capture: bool,
}

impl Default for SocSection {
    fn default() -> Self {
        Self {
            board: "versa_ecp5".to_string(),
            connector: "pcie".to_string(),
            ethernet_control: false,
            debug_capture: false,
        }
    }
}

/// Reset sequencing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
    /// Initial value of the power-on reset countdown, in reference cycles.
    pub por_cycles: u32,
    /// Number of register stages in each domain's reset synchronizer.
    pub sync_stages: u32,
    /// Reference cycles the PLL needs before reporting lock.
    pub pll_lock_cycles: u32,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            por_cycles: 65_535,
            sync_stages: 2,
            pll_lock_cycles: 16,
        }
    }
}

/// A clock domain request.
///
/// `frequency` is either absolute ("125MHz") or relative to another
/// requested domain ("sys/8", "sys*2").
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClockDef {
    /// Target frequency expression.
    pub frequency: String,
    /// Reset discipline of the domain.
    #[serde(default)]
    pub reset: ResetPolicy,
}

/// Ethernet control bridge settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EthernetConfig {
    /// IPv4 address the bridge answers on.
    pub ip_address: Ipv4Addr,
    /// 48-bit MAC address.
    pub mac_address: u64,
}

impl Default for EthernetConfig {
    fn default() -> Self {
        Self {
            ip_address: Ipv4Addr::new(192, 168, 1, 50),
            mac_address: 0x10e2_d500_0000,
        }
    }
}

/// Debug capture settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Number of samples stored per capture.
    pub depth: usize,
    /// Samples kept from before the trigger, included in `depth`.
    pub pre_trigger: usize,
    /// Signal groups to observe, in order. Empty selects every group.
    pub groups: Vec<String>,
    /// Trigger condition. `None` means the capture is triggered from the bus.
    pub trigger: Option<TriggerDef>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            depth: 4096,
            pre_trigger: 0,
            groups: Vec::new(),
            trigger: None,
        }
    }
}

/// A value-match trigger on one observed signal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TriggerDef {
    /// Name of the observed signal.
    pub signal: String,
    /// Value that fires the trigger.
    pub value: u64,
}
