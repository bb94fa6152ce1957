//! Value Change Dump export of a drained capture.
//!
//! One scope per signal group, one `$var` per signal. Sample `i` is stamped
//! at `i * period_fs` with a 1 fs timescale; only changed values are
//! written after the initial `$dumpvars` block.

use crate::error::CaptureError;
use crate::signal::{Sample, SignalRegistry};
use std::io::Write;

/// Writes captured samples as VCD.
pub struct VcdWriter<W: Write> {
    writer: W,
}

impl<W: Write> VcdWriter<W> {
    /// Creates a writer over `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the identifier code for the signal at `index`.
    ///
    /// Printable ASCII from `!`; indices past 93 use multiple characters.
    fn id_code(index: usize) -> String {
        let mut code = String::new();
        let mut idx = index;
        loop {
            code.push((b'!' + (idx % 94) as u8) as char);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        code
    }

    fn format_value(value: u64, width: u32, code: &str) -> String {
        if width == 1 {
            format!("{}{code}", value & 1)
        } else {
            format!("b{value:b} {code}")
        }
    }

    /// Writes the header, definitions and every sample, then flushes.
    pub fn write_capture(
        mut self,
        registry: &SignalRegistry,
        samples: &[Sample],
        period_fs: u64,
    ) -> Result<W, CaptureError> {
        writeln!(self.writer, "$version")?;
        writeln!(self.writer, "  pipesoc capture")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$timescale")?;
        writeln!(self.writer, "  1fs")?;
        writeln!(self.writer, "$end")?;

        let entries = registry.entries();
        let mut open_group: Option<&str> = None;
        for (index, entry) in entries.iter().enumerate() {
            if open_group != Some(entry.group.as_str()) {
                if open_group.is_some() {
                    writeln!(self.writer, "$upscope $end")?;
                }
                writeln!(self.writer, "$scope module {} $end", entry.group)?;
                open_group = Some(entry.group.as_str());
            }
            writeln!(
                self.writer,
                "$var wire {} {} {} $end",
                entry.width,
                Self::id_code(index),
                entry.name
            )?;
        }
        if open_group.is_some() {
            writeln!(self.writer, "$upscope $end")?;
        }
        writeln!(self.writer, "$enddefinitions $end")?;

        let mut previous: Option<&Sample> = None;
        for (i, sample) in samples.iter().enumerate() {
            writeln!(self.writer, "#{}", i as u64 * period_fs)?;
            if previous.is_none() {
                writeln!(self.writer, "$dumpvars")?;
            }
            for (index, entry) in entries.iter().enumerate() {
                let value = sample.get(index).unwrap_or(0);
                if previous.and_then(|p| p.get(index)) == Some(value) {
                    continue;
                }
                writeln!(
                    self.writer,
                    "{}",
                    Self::format_value(value, entry.width, &Self::id_code(index))
                )?;
            }
            if previous.is_none() {
                writeln!(self.writer, "$end")?;
            }
            previous = Some(sample);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
