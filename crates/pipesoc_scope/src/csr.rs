//! Control registers of the capture buffer.
//!
//! Offsets are word indices within the endpoint's region. Readback walks a
//! cursor over the stored words, oldest sample first, least significant
//! word of each sample first.

use crate::buffer::{CaptureBuffer, CaptureState};

/// Capture state code (read-only).
pub const STATE: u32 = 0;
/// Write 1 to arm.
pub const ARM: u32 = 1;
/// Write 1 to trigger a manual capture.
pub const TRIGGER: u32 = 2;
/// Number of stored samples (read-only).
pub const LEVEL: u32 = 3;
/// Words per sample (read-only).
pub const SAMPLE_WORDS: u32 = 4;
/// 1 while a readback word is available (read-only).
pub const READ_VALID: u32 = 5;
/// Word under the readback cursor (read-only).
pub const READ_DATA: u32 = 6;
/// Write to advance the readback cursor.
pub const READ_NEXT: u32 = 7;
/// Configured depth in samples (read-only).
pub const DEPTH: u32 = 8;

/// Number of registers the endpoint decodes.
pub const REGISTER_COUNT: u32 = 9;

/// Register names in offset order, for the CSR map artifact.
pub const REGISTER_NAMES: [&str; REGISTER_COUNT as usize] = [
    "state",
    "arm",
    "trigger",
    "level",
    "sample_words",
    "read_valid",
    "read_data",
    "read_next",
    "depth",
];

/// A capture buffer behind its control registers.
#[derive(Clone, Debug)]
pub struct CaptureCsr {
    buffer: CaptureBuffer,
    readback: Vec<u32>,
    cursor: usize,
}

impl CaptureCsr {
    /// Puts `buffer` behind registers.
    pub fn new(buffer: CaptureBuffer) -> Self {
        Self {
            buffer,
            readback: Vec::new(),
            cursor: 0,
        }
    }

    /// Returns the underlying buffer.
    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    /// Returns the underlying buffer for sampling.
    pub fn buffer_mut(&mut self) -> &mut CaptureBuffer {
        &mut self.buffer
    }

    fn refresh_readback(&mut self) {
        if self.buffer.state() == CaptureState::Full && self.readback.is_empty() {
            self.readback = self.buffer.words();
            self.cursor = 0;
        }
    }

    /// Reads the register at word `offset`. `None` if not decoded.
    pub fn read(&mut self, offset: u32) -> Option<u32> {
        self.refresh_readback();
        let value = match offset {
            STATE => self.buffer.state().code(),
            ARM | TRIGGER | READ_NEXT => 0,
            LEVEL => self.buffer.level() as u32,
            SAMPLE_WORDS => self.buffer.registry().words_per_sample() as u32,
            READ_VALID => u32::from(self.cursor < self.readback.len()),
            READ_DATA => self.readback.get(self.cursor).copied().unwrap_or(0),
            DEPTH => self.buffer.depth() as u32,
            _ => return None,
        };
        Some(value)
    }

    /// Writes the register at word `offset`. Returns false if not decoded.
    /// Writes to read-only registers are ignored.
    pub fn write(&mut self, offset: u32, value: u32) -> bool {
        match offset {
            ARM => {
                if value & 1 == 1 {
                    self.buffer.arm();
                    self.readback.clear();
                    self.cursor = 0;
                }
            }
            TRIGGER => {
                if value & 1 == 1 {
                    self.buffer.force_trigger();
                }
            }
            READ_NEXT => {
                self.refresh_readback();
                if self.cursor < self.readback.len() {
                    self.cursor += 1;
                }
            }
            STATE | LEVEL | SAMPLE_WORDS | READ_VALID | READ_DATA | DEPTH => {}
            _ => return false,
        }
        true
    }
}
