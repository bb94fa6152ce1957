//! Analyzer description artifacts consumed by host tooling.
//!
//! `analyzer.csv` and `analyzer.json` describe the sample layout so a host
//! can decode readback data without the build configuration.

use crate::buffer::CaptureBuffer;
use crate::error::CaptureError;
use crate::signal::SignalEntry;
use serde::Serialize;
use std::fmt::Write as _;

/// Serializable description of a capture's layout and parameters.
#[derive(Debug, Serialize)]
pub struct AnalyzerDescription<'a> {
    /// Total sample width in bits.
    pub sample_width: u32,
    /// 32-bit words per sample.
    pub sample_words: usize,
    /// Samples per capture.
    pub depth: usize,
    /// Signal layout in sample order.
    pub signals: &'a [SignalEntry],
}

impl<'a> AnalyzerDescription<'a> {
    /// Describes `buffer`.
    pub fn of(buffer: &'a CaptureBuffer) -> Self {
        let registry = buffer.registry();
        Self {
            sample_width: registry.sample_width(),
            sample_words: registry.words_per_sample(),
            depth: buffer.depth(),
            signals: registry.entries(),
        }
    }

    /// Renders `analyzer.csv`: `config` rows, then one `signal` row per entry.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "config,sample_width,{}", self.sample_width);
        let _ = writeln!(out, "config,sample_words,{}", self.sample_words);
        let _ = writeln!(out, "config,depth,{}", self.depth);
        for entry in self.signals {
            let _ = writeln!(
                out,
                "signal,{},{},{},{}",
                entry.group, entry.name, entry.width, entry.offset
            );
        }
        out
    }

    /// Renders `analyzer.json`.
    pub fn to_json(&self) -> Result<String, CaptureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
