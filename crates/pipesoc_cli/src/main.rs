//! pipesoc CLI: assembles the USB3 PIPE SoC for a board, writes its build
//! artifacts and runs bring-up in the cycle-level model.

#![warn(missing_docs)]

mod build;
mod check;
mod logging;
mod pipeline;
mod sim;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

/// pipesoc: USB3 PIPE SoC assembly and bring-up model.
#[derive(Parser, Debug)]
#[command(name = "pipesoc", version, about = "USB3 PIPE SoC assembler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `pipesoc.toml` file or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the configuration and print the clock plan.
    Check,
    /// Assemble the system and write its artifacts.
    Build(BuildArgs),
    /// Assemble the system and run bring-up.
    Sim(SimArgs),
}

/// Command-line overrides of the `[soc]` section.
#[derive(Args, Debug, Default, Clone)]
pub struct SocOverrides {
    /// Board profile (`versa_ecp5` or `kc705`).
    #[arg(long)]
    pub board: Option<String>,

    /// Connector carrying the serializer lanes.
    #[arg(long)]
    pub connector: Option<String>,

    /// Attach the Ethernet control bridge.
    #[arg(long)]
    pub with_etherbone: bool,

    /// Attach the debug capture.
    #[arg(long)]
    pub with_analyzer: bool,
}

/// Arguments for `pipesoc build`.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Configuration overrides.
    #[command(flatten)]
    pub overrides: SocOverrides,

    /// Directory the artifacts are written to.
    #[arg(long, default_value = "build")]
    pub output_dir: PathBuf,
}

/// Arguments for `pipesoc sim`.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Configuration overrides.
    #[command(flatten)]
    pub overrides: SocOverrides,

    /// System-clock cycles to simulate.
    #[arg(long, default_value_t = 200_000)]
    pub cycles: u64,

    /// Write the debug capture to this VCD file.
    #[arg(long)]
    pub vcd: Option<PathBuf>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a config file or project directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    logging::init(&global);

    let result = match cli.command {
        Command::Check => check::run(&global),
        Command::Build(ref args) => build::run(args, &global),
        Command::Sim(ref args) => sim::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["pipesoc", "check"]);
        assert!(matches!(cli.command, Command::Check));
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["pipesoc", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.overrides.board.is_none());
                assert!(args.overrides.connector.is_none());
                assert!(!args.overrides.with_etherbone);
                assert!(!args.overrides.with_analyzer);
                assert_eq!(args.output_dir, PathBuf::from("build"));
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_args() {
        let cli = Cli::parse_from([
            "pipesoc",
            "build",
            "--board",
            "kc705",
            "--connector",
            "fmc",
            "--with-etherbone",
            "--with-analyzer",
            "--output-dir",
            "out/kc705",
        ]);
        match cli.command {
            Command::Build(ref args) => {
                assert_eq!(args.overrides.board.as_deref(), Some("kc705"));
                assert_eq!(args.overrides.connector.as_deref(), Some("fmc"));
                assert!(args.overrides.with_etherbone);
                assert!(args.overrides.with_analyzer);
                assert_eq!(args.output_dir, PathBuf::from("out/kc705"));
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_sim() {
        let cli = Cli::parse_from(["pipesoc", "sim", "--cycles", "5000", "--vcd", "cap.vcd"]);
        match cli.command {
            Command::Sim(ref args) => {
                assert_eq!(args.cycles, 5000);
                assert_eq!(args.vcd, Some(PathBuf::from("cap.vcd")));
            }
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn parse_sim_default_cycles() {
        let cli = Cli::parse_from(["pipesoc", "sim"]);
        match cli.command {
            Command::Sim(ref args) => {
                assert_eq!(args.cycles, 200_000);
                assert!(args.vcd.is_none());
            }
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["pipesoc", "--quiet", "--config", "/tmp/pipesoc.toml", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("/tmp/pipesoc.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pipesoc", "sim", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["pipesoc", "flash"]).is_err());
    }
}
