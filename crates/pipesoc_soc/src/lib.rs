//! Assembly and cycle-level simulation of a USB3 PIPE SoC.
//!
//! A [`SocBuilder`] turns a validated configuration into a [`System`]: it
//! solves the clock plan, binds the serializer to the chosen connector,
//! connects the serializer, link layer and protocol core with four ready/valid
//! streams, and lays out the control bus. The system is then stepped one
//! rising edge at a time and accessed from the host through [`ControlBus`].
//!
//! # Usage
//!
//! ```ignore
//! use pipesoc_soc::SocBuilder;
//!
//! let config = pipesoc_config::load_config_from_str("[soc]\nboard = \"kc705\"\n")?;
//! let mut system = SocBuilder::new(config).build()?;
//! system.run_until(200_000, |s| s.link().ready())?;
//! assert!(system.link().ready());
//! ```
//!
//! # Modules
//!
//! - `subsystem`: Model traits for the serializer, link layer and core
//! - `serdes`, `link`, `echo`, `ethernet`: Reference subsystem models
//! - `bus`: Control-bus address map
//! - `probe`: Signals offered to the debug capture
//! - `assemble`: The builder
//! - `system`: The assembled system and its simulation loop
//! - `artifacts`: Rendered build outputs

#![warn(missing_docs)]

pub mod artifacts;
pub mod assemble;
pub mod bus;
pub mod echo;
pub mod error;
pub mod ethernet;
pub mod link;
pub mod probe;
pub mod serdes;
pub mod status;
pub mod subsystem;
pub mod system;

pub use artifacts::{pins_csv, Artifacts};
pub use assemble::{SocBuilder, SYS_DOMAIN};
pub use bus::{CsrMap, Endpoint, REGION_SIZE, REGISTER_STRIDE};
pub use echo::EchoCore;
pub use error::{AssembleError, SimError};
pub use ethernet::EthernetControl;
pub use link::{LinkModel, LinkState, LINK_TRAINING_CYCLES};
pub use pipesoc_common::{BusError, ControlBus};
pub use probe::{probe_groups, CycleView, StreamView, STREAM_GROUPS};
pub use serdes::{SerdesModel, SERDES_LOCK_CYCLES};
pub use status::{status_outputs, StatusLeds};
pub use subsystem::{LinkLayer, Serializer, Subsystem, Symbol};
pub use system::{System, IDENT};
