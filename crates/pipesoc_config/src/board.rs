//! Board profiles: reference clock, PLL family, default clock domains, reset
//! pin, and the differential pin groups of every serializer connector.

use pipesoc_common::{Frequency, ResetPolicy};
use std::fmt;
use std::str::FromStr;

/// The boards a system can be assembled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardKind {
    /// Lattice ECP5 Versa evaluation board.
    VersaEcp5,
    /// Xilinx KC705 evaluation board (Kintex-7).
    Kc705,
}

impl FromStr for BoardKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "versa_ecp5" | "versa" => Ok(BoardKind::VersaEcp5),
            "kc705" => Ok(BoardKind::Kc705),
            _ => Err(()),
        }
    }
}

/// A serializer connector on a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Connector {
    /// PCIe edge-connector lane.
    Pcie,
    /// SMA coaxial connectors.
    Sma,
    /// USB3 mezzanine on the HPC FMC connector.
    Fmc,
}

impl Connector {
    /// Returns the canonical lower-case connector name.
    pub fn name(self) -> &'static str {
        match self {
            Connector::Pcie => "pcie",
            Connector::Sma => "sma",
            Connector::Fmc => "fmc",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Connector {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pcie" => Ok(Connector::Pcie),
            "sma" => Ok(Connector::Sma),
            "fmc" | "usb3" => Ok(Connector::Fmc),
            _ => Err(()),
        }
    }
}

/// PLL primitive family and its operating limits selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PllFamily {
    /// Lattice ECP5 EHXPLLL.
    Ecp5,
    /// Xilinx 7-series PLLE2 with the given speed grade (-1, -2, -3).
    Series7 {
        /// Device speed grade.
        speedgrade: i8,
    },
}

/// A differential pin pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffPair {
    /// Positive leg.
    pub p: &'static str,
    /// Negative leg.
    pub n: &'static str,
}

/// The pins and transceiver channel bound to one connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectorPins {
    /// Which connector this is.
    pub connector: Connector,
    /// Transceiver channel index within the serializer block.
    pub channel: u8,
    /// Transmit pair.
    pub tx: DiffPair,
    /// Receive pair.
    pub rx: DiffPair,
}

/// A named single-ended board pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPin {
    /// Platform signal name.
    pub name: &'static str,
    /// True if the pin is asserted when driven low.
    pub active_low: bool,
}

/// A clock domain every system on this board instantiates by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomainDefault {
    /// Domain name.
    pub name: &'static str,
    /// Frequency expression, absolute or relative to an earlier domain.
    pub frequency: &'static str,
    /// Reset discipline.
    pub reset: ResetPolicy,
}

/// Static description of a supported board.
#[derive(Debug)]
pub struct BoardProfile {
    /// Board kind.
    pub kind: BoardKind,
    /// Canonical board name.
    pub name: &'static str,
    /// Reference clock pin.
    pub reference_pin: &'static str,
    /// Reference clock frequency in Hertz.
    pub reference_hz: f64,
    /// PLL family used to derive every domain.
    pub pll: PllFamily,
    /// Domains generated by the PLL, in generation order.
    pub domains: &'static [DomainDefault],
    /// Serializer connectors the board wires up.
    pub connectors: &'static [ConnectorPins],
    /// System reset input.
    pub reset_pin: BoardPin,
    /// Status LED pins: serializer status, link status.
    pub leds: [&'static str; 2],
}

impl BoardProfile {
    /// Returns the reference clock frequency.
    pub fn reference(&self) -> Frequency {
        Frequency::new(self.reference_hz)
    }

    /// Returns the pin binding for `connector`, if the board has one.
    pub fn connector(&self, connector: Connector) -> Option<&ConnectorPins> {
        self.connectors.iter().find(|c| c.connector == connector)
    }
}

static VERSA_ECP5: BoardProfile = BoardProfile {
    kind: BoardKind::VersaEcp5,
    name: "versa_ecp5",
    reference_pin: "clk100",
    reference_hz: 100e6,
    pll: PllFamily::Ecp5,
    domains: &[
        DomainDefault {
            name: "sys",
            frequency: "125MHz",
            reset: ResetPolicy::Synchronous,
        },
        DomainDefault {
            name: "clk250",
            frequency: "250MHz",
            reset: ResetPolicy::Synchronous,
        },
    ],
    connectors: &[
        ConnectorPins {
            connector: Connector::Pcie,
            channel: 0,
            tx: DiffPair { p: "W4", n: "W5" },
            rx: DiffPair { p: "Y5", n: "Y6" },
        },
        ConnectorPins {
            connector: Connector::Sma,
            channel: 1,
            tx: DiffPair { p: "W8", n: "W9" },
            rx: DiffPair { p: "Y7", n: "Y8" },
        },
    ],
    reset_pin: BoardPin {
        name: "rst_n",
        active_low: true,
    },
    leds: ["user_led0", "user_led1"],
};

static KC705: BoardProfile = BoardProfile {
    kind: BoardKind::Kc705,
    name: "kc705",
    reference_pin: "clk200",
    reference_hz: 200e6,
    pll: PllFamily::Series7 { speedgrade: -2 },
    domains: &[
        DomainDefault {
            name: "sys",
            frequency: "125MHz",
            reset: ResetPolicy::Synchronous,
        },
        DomainDefault {
            name: "oob",
            frequency: "sys/8",
            reset: ResetPolicy::Synchronous,
        },
        DomainDefault {
            name: "clk125",
            frequency: "125MHz",
            reset: ResetPolicy::Synchronous,
        },
    ],
    connectors: &[
        ConnectorPins {
            connector: Connector::Pcie,
            channel: 0,
            tx: DiffPair { p: "L4", n: "L3" },
            rx: DiffPair { p: "M6", n: "M5" },
        },
        ConnectorPins {
            connector: Connector::Sma,
            channel: 0,
            tx: DiffPair { p: "K2", n: "K1" },
            rx: DiffPair { p: "K6", n: "K5" },
        },
        ConnectorPins {
            connector: Connector::Fmc,
            channel: 0,
            tx: DiffPair {
                p: "HPC:DP0_C2M_P",
                n: "HPC:DP0_C2M_N",
            },
            rx: DiffPair {
                p: "HPC:DP0_M2C_P",
                n: "HPC:DP0_M2C_N",
            },
        },
    ],
    reset_pin: BoardPin {
        name: "cpu_reset",
        active_low: false,
    },
    leds: ["user_led0", "user_led1"],
};

/// Returns the static profile of `kind`.
pub fn board_profile(kind: BoardKind) -> &'static BoardProfile {
    match kind {
        BoardKind::VersaEcp5 => &VERSA_ECP5,
        BoardKind::Kc705 => &KC705,
    }
}
