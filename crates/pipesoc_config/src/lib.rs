//! Parsing and validation of `pipesoc.toml` build-time configuration.
//!
//! This crate reads the configuration file, resolves the board profile and
//! connector, and produces an immutable [`ValidatedConfig`] that drives which
//! subsystems the assembler instantiates.

#![warn(missing_docs)]

pub mod board;
pub mod error;
pub mod loader;
pub mod types;
pub mod validate;

pub use board::{
    board_profile, BoardKind, BoardPin, BoardProfile, Connector, ConnectorPins, DiffPair,
    DomainDefault, PllFamily,
};
pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, parse_config, CONFIG_FILE};
pub use types::*;
pub use validate::{validate, DomainRequest, ValidatedConfig, POR_DOMAIN};
