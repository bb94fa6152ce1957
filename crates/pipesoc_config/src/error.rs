//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `pipesoc.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// The board name does not match any known board profile.
    #[error("unsupported board '{0}'")]
    UnsupportedBoard(String),

    /// The connector is unknown or not wired on the selected board.
    #[error("connector '{connector}' is not supported on board '{board}'")]
    UnsupportedConnector {
        /// The board the connector was requested for.
        board: String,
        /// The requested connector name.
        connector: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
