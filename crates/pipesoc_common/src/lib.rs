//! Shared foundational types used across the pipesoc workspace.
//!
//! Provides frequency values with period conversion, the reset discipline of
//! a clock domain, the opaque ID newtypes used to index clock domains and
//! control-bus endpoints, and the host control-bus access trait.

#![warn(missing_docs)]

pub mod bus;
pub mod frequency;
pub mod ids;
pub mod reset_policy;

pub use bus::{BusError, ControlBus};
pub use frequency::{Frequency, ParseFrequencyError, FS_PER_SECOND};
pub use ids::{DomainId, EndpointId};
pub use reset_policy::ResetPolicy;
