//! Shared configuration loading for all subcommands.
//!
//! `--config` may name a file or a directory holding `pipesoc.toml`. Without
//! it the current directory is searched; a missing file means the reference
//! defaults.

use std::path::{Path, PathBuf};

use pipesoc_config::{parse_config, validate, SocConfig, ValidatedConfig, CONFIG_FILE};

use crate::{GlobalArgs, SocOverrides};

/// Finds the configuration file to load, if any.
pub fn resolve_config_path(
    global: &GlobalArgs,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config) => {
            let path = PathBuf::from(config);
            let file = if path.is_dir() { path.join(CONFIG_FILE) } else { path };
            if !file.is_file() {
                return Err(format!("configuration file not found: {}", file.display()).into());
            }
            Ok(Some(file))
        }
        None => {
            let file = std::env::current_dir()?.join(CONFIG_FILE);
            Ok(file.is_file().then_some(file))
        }
    }
}

/// Reads the raw configuration at `path`, or the defaults.
pub fn read_config(path: Option<&Path>) -> Result<SocConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            Ok(parse_config(&std::fs::read_to_string(path)?)?)
        }
        None => {
            tracing::debug!("no {CONFIG_FILE} found, using defaults");
            Ok(SocConfig::default())
        }
    }
}

/// Applies command-line overrides to the `[soc]` section.
pub fn apply_overrides(config: &mut SocConfig, overrides: &SocOverrides) {
    if let Some(ref board) = overrides.board {
        config.soc.board = board.clone();
    }
    if let Some(ref connector) = overrides.connector {
        config.soc.connector = connector.clone();
    }
    config.soc.ethernet_control |= overrides.with_etherbone;
    config.soc.debug_capture |= overrides.with_analyzer;
}

/// Loads, overrides and validates the configuration.
pub fn load(
    global: &GlobalArgs,
    overrides: &SocOverrides,
) -> Result<ValidatedConfig, Box<dyn std::error::Error>> {
    let path = resolve_config_path(global)?;
    let mut config = read_config(path.as_deref())?;
    apply_overrides(&mut config, overrides);
    Ok(validate(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipesoc_config::{BoardKind, Connector};
    use std::fs;
    use tempfile::TempDir;

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: config.map(|p| p.display().to_string()),
        }
    }

    #[test]
    fn config_from_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[soc]\nboard = \"kc705\"\n").unwrap();
        let config = load(&global(Some(tmp.path())), &SocOverrides::default()).unwrap();
        assert_eq!(config.board().kind, BoardKind::Kc705);
    }

    #[test]
    fn config_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[soc]\nconnector = \"sma\"\n").unwrap();
        let config = load(&global(Some(&path)), &SocOverrides::default()).unwrap();
        assert_eq!(config.connector(), Connector::Sma);
    }

    #[test]
    fn missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");
        assert!(resolve_config_path(&global(Some(&path))).is_err());
    }

    #[test]
    fn overrides_win() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[soc]\nboard = \"versa_ecp5\"\nconnector = \"sma\"\n",
        )
        .unwrap();
        let overrides = SocOverrides {
            board: Some("kc705".into()),
            connector: Some("fmc".into()),
            with_etherbone: true,
            with_analyzer: false,
        };
        let config = load(&global(Some(tmp.path())), &overrides).unwrap();
        assert_eq!(config.board().kind, BoardKind::Kc705);
        assert_eq!(config.connector(), Connector::Fmc);
        assert!(config.ethernet_control());
        assert!(!config.debug_capture());
    }

    #[test]
    fn invalid_override_rejected() {
        let mut config = SocConfig::default();
        apply_overrides(
            &mut config,
            &SocOverrides {
                connector: Some("fmc".into()),
                ..SocOverrides::default()
            },
        );
        assert!(validate(&config).is_err());
    }
}
