//! Clock domains produced by the generator.

use pipesoc_common::{DomainId, Frequency, ResetPolicy};
use serde::Serialize;

/// The board input that feeds the PLL.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClockInput {
    /// Reference clock pin.
    pub pin: String,
    /// Reference frequency.
    pub frequency: Frequency,
}

impl ClockInput {
    /// Creates a reference input.
    pub fn new(pin: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            pin: pin.into(),
            frequency,
        }
    }
}

/// Where a domain's clock comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockSource {
    /// Clocked directly by the board reference.
    Reference,
    /// Clocked by the given PLL output.
    Pll {
        /// Output index in the PLL configuration.
        output: usize,
    },
}

/// A named clock domain with its achieved frequency and reset discipline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClockDomain {
    /// Index of the domain within its plan.
    pub id: DomainId,
    /// Domain name.
    pub name: String,
    /// Achieved clock frequency.
    pub frequency: Frequency,
    /// Reset discipline.
    pub reset: ResetPolicy,
    /// Clock source.
    pub source: ClockSource,
}

impl ClockDomain {
    /// Returns the net name the domain's clock is driven on.
    pub fn clock_net(&self) -> String {
        format!("{}_clk", self.name)
    }

    /// Returns true if the domain is clocked by a PLL output.
    pub fn is_derived(&self) -> bool {
        matches!(self.source, ClockSource::Pll { .. })
    }
}
