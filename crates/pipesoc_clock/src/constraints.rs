//! Clock period constraints registered for downstream timing verification.
//!
//! Every clock the plan produces gets exactly one `create_clock` entry:
//! the board reference on its input port and each PLL output on the net it
//! drives. The set is emitted as SDC text for the timing tools.

use crate::error::ClockError;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Object a clock constraint is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum ClockTarget {
    /// A top-level input port.
    Port(String),
    /// An internal net, such as a PLL output.
    Net(String),
}

/// A clock constraint corresponding to one SDC `create_clock` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConstraint {
    /// The name of the clock.
    pub name: String,
    /// Clock period in nanoseconds.
    pub period_ns: f64,
    /// The port or net the clock is applied to.
    pub target: ClockTarget,
}

impl ClockConstraint {
    /// Returns the constrained frequency in MHz.
    pub fn frequency_mhz(&self) -> f64 {
        if self.period_ns > 0.0 {
            1000.0 / self.period_ns
        } else {
            0.0
        }
    }
}

/// The period constraints of one clock plan, in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintSet {
    clocks: Vec<ClockConstraint>,
}

impl ConstraintSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constraint. A clock name may be registered only once.
    pub fn register(&mut self, constraint: ClockConstraint) -> Result<(), ClockError> {
        if self.find(&constraint.name).is_some() {
            return Err(ClockError::DuplicateConstraint(constraint.name));
        }
        self.clocks.push(constraint);
        Ok(())
    }

    /// Returns the constraint for the named clock, if any.
    pub fn find(&self, name: &str) -> Option<&ClockConstraint> {
        self.clocks.iter().find(|c| c.name == name)
    }

    /// Returns the number of registered clocks.
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    /// Iterates the constraints in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ClockConstraint> {
        self.clocks.iter()
    }

    /// Renders the set as SDC `create_clock` commands.
    pub fn to_sdc(&self) -> String {
        let mut out = String::new();
        for clock in &self.clocks {
            let target = match &clock.target {
                ClockTarget::Port(p) => format!("[get_ports {{{p}}}]"),
                ClockTarget::Net(n) => format!("[get_nets {{{n}}}]"),
            };
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "create_clock -name {} -period {:.3} {target}",
                clock.name, clock.period_ns
            );
        }
        out
    }
}
