//! Validation of a parsed [`SocConfig`] into an immutable [`ValidatedConfig`].
//!
//! Validation is the only place board and connector names are resolved.
//! Nothing downstream re-checks them: holding a `ValidatedConfig` is proof
//! that the selection is supported.

use crate::board::{board_profile, BoardKind, BoardProfile, Connector, ConnectorPins};
use crate::error::ConfigError;
use crate::types::{CaptureConfig, ClockDef, EthernetConfig, ResetConfig, SocConfig};
use pipesoc_common::ResetPolicy;

/// Name of the reset-less power-on reset domain clocked by the reference input.
pub const POR_DOMAIN: &str = "por";

/// Minimum and maximum reset synchronizer depth.
const SYNC_STAGES: std::ops::RangeInclusive<u32> = 2..=4;

/// A clock domain request after merging board defaults with overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRequest {
    /// Domain name.
    pub name: String,
    /// Frequency expression.
    pub frequency: String,
    /// Reset discipline.
    pub reset: ResetPolicy,
}

/// A configuration that passed validation. Immutable.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    board: &'static BoardProfile,
    pins: ConnectorPins,
    ethernet_control: bool,
    debug_capture: bool,
    reset: ResetConfig,
    domains: Vec<DomainRequest>,
    ethernet: EthernetConfig,
    capture: CaptureConfig,
}

impl ValidatedConfig {
    /// Returns the selected board profile.
    pub fn board(&self) -> &'static BoardProfile {
        self.board
    }

    /// Returns the selected connector.
    pub fn connector(&self) -> Connector {
        self.pins.connector
    }

    /// Returns the serializer pin binding for the selected connector.
    pub fn connector_pins(&self) -> &ConnectorPins {
        &self.pins
    }

    /// Returns true if the Ethernet control bridge is attached.
    pub fn ethernet_control(&self) -> bool {
        self.ethernet_control
    }

    /// Returns true if the debug capture buffer is attached.
    pub fn debug_capture(&self) -> bool {
        self.debug_capture
    }

    /// Returns reset sequencing settings.
    pub fn reset(&self) -> &ResetConfig {
        &self.reset
    }

    /// Returns the PLL domain requests in generation order.
    pub fn domains(&self) -> &[DomainRequest] {
        &self.domains
    }

    /// Returns Ethernet bridge settings.
    pub fn ethernet(&self) -> &EthernetConfig {
        &self.ethernet
    }

    /// Returns debug capture settings.
    pub fn capture(&self) -> &CaptureConfig {
        &self.capture
    }
}

/// Validates a parsed configuration.
///
/// Resolves the board and connector, checks reset and capture settings, and
/// merges `[clocks]` over the board's default domains: an override keeps the
/// default's position, new domains follow in name order.
pub fn validate(config: &SocConfig) -> Result<ValidatedConfig, ConfigError> {
    let kind: BoardKind = config
        .soc
        .board
        .parse()
        .map_err(|()| ConfigError::UnsupportedBoard(config.soc.board.clone()))?;
    let board = board_profile(kind);

    let unsupported = || ConfigError::UnsupportedConnector {
        board: board.name.to_string(),
        connector: config.soc.connector.clone(),
    };
    let connector: Connector = config.soc.connector.parse().map_err(|()| unsupported())?;
    let pins = *board.connector(connector).ok_or_else(unsupported)?;

    validate_reset(&config.reset)?;
    if config.soc.debug_capture {
        validate_capture(&config.capture)?;
    }
    let domains = merge_domains(board, &config.clocks)?;

    tracing::debug!(
        board = board.name,
        connector = %connector,
        channel = pins.channel,
        domains = domains.len(),
        "configuration validated"
    );

    Ok(ValidatedConfig {
        board,
        pins,
        ethernet_control: config.soc.ethernet_control,
        debug_capture: config.soc.debug_capture,
        reset: config.reset,
        domains,
        ethernet: config.ethernet,
        capture: config.capture.clone(),
    })
}

fn validate_reset(reset: &ResetConfig) -> Result<(), ConfigError> {
    if reset.por_cycles == 0 {
        return Err(ConfigError::ValidationError(
            "reset.por_cycles must be at least 1".to_string(),
        ));
    }
    if !SYNC_STAGES.contains(&reset.sync_stages) {
        return Err(ConfigError::ValidationError(format!(
            "reset.sync_stages must be between {} and {}, got {}",
            SYNC_STAGES.start(),
            SYNC_STAGES.end(),
            reset.sync_stages
        )));
    }
    Ok(())
}

fn validate_capture(capture: &CaptureConfig) -> Result<(), ConfigError> {
    if capture.depth == 0 {
        return Err(ConfigError::ValidationError(
            "capture.depth must be at least 1".to_string(),
        ));
    }
    if capture.pre_trigger >= capture.depth {
        return Err(ConfigError::ValidationError(format!(
            "capture.pre_trigger ({}) must be smaller than capture.depth ({})",
            capture.pre_trigger, capture.depth
        )));
    }
    Ok(())
}

fn merge_domains(
    board: &BoardProfile,
    overrides: &std::collections::BTreeMap<String, ClockDef>,
) -> Result<Vec<DomainRequest>, ConfigError> {
    if overrides.contains_key(POR_DOMAIN) {
        return Err(ConfigError::ValidationError(format!(
            "clock domain '{POR_DOMAIN}' is reserved for power-on reset"
        )));
    }

    let mut domains: Vec<DomainRequest> = board
        .domains
        .iter()
        .map(|d| match overrides.get(d.name) {
            Some(def) => DomainRequest {
                name: d.name.to_string(),
                frequency: def.frequency.clone(),
                reset: def.reset,
            },
            None => DomainRequest {
                name: d.name.to_string(),
                frequency: d.frequency.to_string(),
                reset: d.reset,
            },
        })
        .collect();

    for (name, def) in overrides {
        if board.domains.iter().any(|d| d.name == name) {
            continue;
        }
        domains.push(DomainRequest {
            name: name.clone(),
            frequency: def.frequency.clone(),
            reset: def.reset,
        });
    }
    Ok(domains)
}
