//! Clock domain generation, period constraints and reset sequencing.
//!
//! [`ClockDomainGenerator`] solves one PLL configuration for a set of named
//! frequency requests and registers a period constraint for every clock it
//! produces. [`PowerOnReset`] and the synchronizers in [`reset`] sequence
//! bring-up across those domains, and [`EdgeScheduler`] orders their rising
//! edges for simulation.

#![warn(missing_docs)]

pub mod constraints;
pub mod domain;
pub mod error;
pub mod expr;
pub mod generator;
pub mod pll;
pub mod reset;
pub mod schedule;

pub use constraints::{ClockConstraint, ClockTarget, ConstraintSet};
pub use domain::{ClockDomain, ClockInput, ClockSource};
pub use error::ClockError;
pub use expr::FrequencyExpr;
pub use generator::{ClockDomainGenerator, ClockPlan};
pub use pll::{solve, PllConfig, PllLimits, PllLock, PllOutput, PllRequest};
pub use reset::{BitSynchronizer, PowerOnReset, ResetSynchronizer};
pub use schedule::{EdgeScheduler, EdgeSet, FS_PER_NS};
