//! Build artifacts describing an assembled system.

use crate::system::System;
use pipesoc_config::ValidatedConfig;
use pipesoc_scope::{AnalyzerDescription, CaptureError};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Control-bus map file name.
pub const CSR_CSV: &str = "csr.csv";
/// Timing constraints file name.
pub const CONSTRAINTS_SDC: &str = "constraints.sdc";
/// Pin assignment file name.
pub const PINS_CSV: &str = "pins.csv";
/// Capture layout file name.
pub const ANALYZER_CSV: &str = "analyzer.csv";
/// Machine-readable capture layout file name.
pub const ANALYZER_JSON: &str = "analyzer.json";

/// Rendered artifacts of one system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    /// `csr.csv`.
    pub csr_csv: String,
    /// `constraints.sdc`.
    pub constraints_sdc: String,
    /// `pins.csv`.
    pub pins_csv: String,
    /// `analyzer.csv`, present with debug capture.
    pub analyzer_csv: Option<String>,
    /// `analyzer.json`, present with debug capture.
    pub analyzer_json: Option<String>,
}

impl Artifacts {
    /// Renders every artifact of `system`.
    pub fn collect(system: &System) -> Result<Self, CaptureError> {
        let (analyzer_csv, analyzer_json) = match system.capture() {
            Some(capture) => {
                let description = AnalyzerDescription::of(capture.buffer());
                (Some(description.to_csv()), Some(description.to_json()?))
            }
            None => (None, None),
        };
        Ok(Self {
            csr_csv: system.csr_map().to_csv(),
            constraints_sdc: system.plan().constraints.to_sdc(),
            pins_csv: pins_csv(system.config()),
            analyzer_csv,
            analyzer_json,
        })
    }

    /// Writes the artifacts into `dir`, creating it if needed, and returns
    /// the written paths.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let files = [
            (CSR_CSV, Some(&self.csr_csv)),
            (CONSTRAINTS_SDC, Some(&self.constraints_sdc)),
            (PINS_CSV, Some(&self.pins_csv)),
            (ANALYZER_CSV, self.analyzer_csv.as_ref()),
            (ANALYZER_JSON, self.analyzer_json.as_ref()),
        ];
        let mut written = Vec::new();
        for (name, content) in files {
            let Some(content) = content else { continue };
            let path = dir.join(name);
            std::fs::write(&path, content)?;
            tracing::debug!(path = %path.display(), bytes = content.len(), "artifact written");
            written.push(path);
        }
        Ok(written)
    }
}

/// Renders `pins.csv`: `kind,name,value` rows for the reference clock, the
/// reset input, the status LEDs and the serializer lanes.
pub fn pins_csv(config: &ValidatedConfig) -> String {
    let board = config.board();
    let pins = config.connector_pins();
    let mut out = String::from("kind,name,value\n");
    let _ = writeln!(out, "clock,{},{}", board.reference_pin, board.reference());
    let _ = writeln!(
        out,
        "reset,{},{}",
        board.reset_pin.name,
        if board.reset_pin.active_low {
            "active_low"
        } else {
            "active_high"
        }
    );
    for (led, role) in board.leds.iter().zip(["serializer", "link"]) {
        let _ = writeln!(out, "led,{led},{role}");
    }
    let _ = writeln!(out, "serdes,connector,{}", pins.connector);
    let _ = writeln!(out, "serdes,channel,{}", pins.channel);
    let _ = writeln!(out, "serdes,tx_p,{}", pins.tx.p);
    let _ = writeln!(out, "serdes,tx_n,{}", pins.tx.n);
    let _ = writeln!(out, "serdes,rx_p,{}", pins.rx.p);
    let _ = writeln!(out, "serdes,rx_n,{}", pins.rx.n);
    out
}
