//! PLL operating limits and the configuration solver.
//!
//! A single PLL multiplies the reference up to an internal VCO frequency
//! (`f_vco = f_ref * feedback_mult / input_div`) and divides the VCO down
//! once per output (`f_out = f_vco / output_div`). The solver searches the
//! integer divider space for one VCO frequency that serves every requested
//! output within the tolerance margin.

use crate::error::ClockError;
use pipesoc_common::Frequency;
use pipesoc_config::PllFamily;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Integer ranges and frequency bands of one PLL primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct PllLimits {
    /// Human-readable primitive name.
    pub primitive: &'static str,
    /// Reference input divider range.
    pub input_div: RangeInclusive<u32>,
    /// Feedback multiplier range.
    pub feedback_mult: RangeInclusive<u32>,
    /// Per-output divider range.
    pub output_div: RangeInclusive<u32>,
    /// Accepted reference input band in Hz.
    pub input_hz: (f64, f64),
    /// Valid VCO band in Hz.
    pub vco_hz: (f64, f64),
    /// Fraction of the VCO band kept clear at both ends.
    pub vco_margin: f64,
    /// Number of output clocks.
    pub max_outputs: usize,
    /// Accepted relative error of each output.
    pub margin: f64,
    /// Search the multiplier from the top, preferring the highest VCO.
    pub prefer_high_vco: bool,
}

impl PllLimits {
    /// Limits of the Lattice ECP5 EHXPLLL.
    pub fn ecp5() -> Self {
        Self {
            primitive: "EHXPLLL",
            input_div: 1..=128,
            feedback_mult: 1..=128,
            output_div: 1..=128,
            input_hz: (8e6, 400e6),
            vco_hz: (400e6, 800e6),
            vco_margin: 0.0,
            max_outputs: 3,
            margin: 1e-2,
            prefer_high_vco: false,
        }
    }

    /// Limits of the Xilinx 7-series PLLE2 for a speed grade.
    pub fn series7(speedgrade: i8) -> Self {
        let vco_max = match speedgrade {
            -1 => 1600e6,
            -3 => 2133e6,
            _ => 1866e6,
        };
        Self {
            primitive: "PLLE2_ADV",
            input_div: 1..=56,
            feedback_mult: 2..=64,
            output_div: 1..=128,
            input_hz: (19e6, 800e6),
            vco_hz: (800e6, vco_max),
            vco_margin: 0.0,
            max_outputs: 6,
            margin: 1e-2,
            prefer_high_vco: true,
        }
    }

    /// Returns the limits of a board's PLL family.
    pub fn for_family(family: PllFamily) -> Self {
        match family {
            PllFamily::Ecp5 => Self::ecp5(),
            PllFamily::Series7 { speedgrade } => Self::series7(speedgrade),
        }
    }

    fn vco_accepts(&self, vco: f64) -> bool {
        let (min, max) = self.vco_hz;
        vco >= min * (1.0 + self.vco_margin) && vco <= max * (1.0 - self.vco_margin)
    }
}

/// One requested PLL output.
#[derive(Clone, Debug, PartialEq)]
pub struct PllRequest {
    /// Output name (the domain it clocks).
    pub name: String,
    /// Requested frequency.
    pub target: Frequency,
}

/// One solved PLL output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PllOutput {
    /// Output name.
    pub name: String,
    /// VCO divider.
    pub divider: u32,
    /// Requested frequency.
    pub target: Frequency,
    /// Frequency the divider actually produces.
    pub achieved: Frequency,
}

/// A PLL configuration that serves every requested output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PllConfig {
    /// Reference input divider.
    pub input_div: u32,
    /// Feedback multiplier.
    pub feedback_mult: u32,
    /// Resulting VCO frequency.
    pub vco: Frequency,
    /// Solved outputs, in request order.
    pub outputs: Vec<PllOutput>,
}

/// Searches for a PLL configuration producing every request from `reference`.
pub fn solve(
    limits: &PllLimits,
    reference: Frequency,
    requests: &[PllRequest],
) -> Result<PllConfig, ClockError> {
    if requests.len() > limits.max_outputs {
        return Err(ClockError::TooManyOutputs {
            requested: requests.len(),
            max: limits.max_outputs,
        });
    }
    let (in_min, in_max) = limits.input_hz;
    if reference.hz() < in_min || reference.hz() > in_max {
        return Err(ClockError::ReferenceOutOfRange {
            reference,
            min: Frequency::new(in_min),
            max: Frequency::new(in_max),
        });
    }

    for input_div in limits.input_div.clone() {
        let mults: Box<dyn Iterator<Item = u32>> = if limits.prefer_high_vco {
            Box::new(limits.feedback_mult.clone().rev())
        } else {
            Box::new(limits.feedback_mult.clone())
        };
        for feedback_mult in mults {
            let vco = reference.hz() * f64::from(feedback_mult) / f64::from(input_div);
            if !limits.vco_accepts(vco) {
                continue;
            }
            let vco = Frequency::new(vco);
            if let Some(outputs) = fit_outputs(limits, vco, requests) {
                tracing::debug!(
                    primitive = limits.primitive,
                    input_div,
                    feedback_mult,
                    vco = %vco,
                    "pll configuration found"
                );
                return Ok(PllConfig {
                    input_div,
                    feedback_mult,
                    vco,
                    outputs,
                });
            }
        }
    }

    let targets = requests
        .iter()
        .map(|r| format!("{}={}", r.name, r.target))
        .collect::<Vec<_>>()
        .join(", ");
    Err(ClockError::Unachievable { reference, targets })
}

/// Picks the smallest divider for each request at this VCO frequency.
fn fit_outputs(
    limits: &PllLimits,
    vco: Frequency,
    requests: &[PllRequest],
) -> Option<Vec<PllOutput>> {
    requests
        .iter()
        .map(|req| {
            limits.output_div.clone().find_map(|divider| {
                let achieved = Frequency::new(vco.hz() / f64::from(divider));
                achieved.within(req.target, limits.margin).then(|| PllOutput {
                    name: req.name.clone(),
                    divider,
                    target: req.target,
                    achieved,
                })
            })
        })
        .collect()
}

/// Lock indicator of a running PLL.
///
/// Reports lock after a fixed number of reference cycles; dropping the
/// reference (a re-activation) restarts the count.
#[derive(Clone, Debug)]
pub struct PllLock {
    remaining: u32,
    cycles: u32,
}

impl PllLock {
    /// Creates an unlocked PLL that locks after `cycles` reference edges.
    pub fn new(cycles: u32) -> Self {
        Self {
            remaining: cycles,
            cycles,
        }
    }

    /// Advances one reference edge.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Returns true once the PLL has locked.
    pub fn locked(&self) -> bool {
        self.remaining == 0
    }

    /// Restarts lock acquisition.
    pub fn restart(&mut self) {
        self.remaining = self.cycles;
    }
}
