//! Probe signals, signal groups and the registry that lays them out in a
//! sample word.
//!
//! Signals are packed LSB-first in registry order: the first signal of the
//! first group occupies bit 0. A sample is stored as `ceil(width / 32)`
//! 32-bit words, least significant word first.

use crate::error::CaptureError;
use serde::Serialize;

/// Widest signal a probe can observe.
pub const MAX_SIGNAL_WIDTH: u32 = 64;

/// One observed signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeSignal {
    /// Signal name, unique within a registry.
    pub name: String,
    /// Width in bits.
    pub width: u32,
}

impl ProbeSignal {
    /// Creates a probe signal.
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// A named, ordered group of signals selected together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalGroup {
    /// Group name.
    pub name: String,
    /// Signals in the group, in order.
    pub signals: Vec<ProbeSignal>,
}

impl SignalGroup {
    /// Creates a group.
    pub fn new(name: impl Into<String>, signals: Vec<ProbeSignal>) -> Self {
        Self {
            name: name.into(),
            signals,
        }
    }
}

/// A signal's placement in the sample word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignalEntry {
    /// Signal name.
    pub name: String,
    /// Width in bits.
    pub width: u32,
    /// Group the signal belongs to.
    pub group: String,
    /// Bit offset of the signal's LSB within the sample.
    pub offset: u32,
}

impl SignalEntry {
    fn mask(&self) -> u64 {
        if self.width >= 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    /// Returns true if `value` fits the signal width.
    pub fn fits(&self, value: u64) -> bool {
        value & !self.mask() == 0
    }
}

/// One captured sample: a value per registry entry, in registry order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Sample {
    values: Vec<u64>,
}

impl Sample {
    /// Returns the values in registry order.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Returns the value of the entry at `index`.
    pub fn get(&self, index: usize) -> Option<u64> {
        self.values.get(index).copied()
    }
}

/// The ordered set of observed signals and their layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignalRegistry {
    entries: Vec<SignalEntry>,
    width: u32,
}

impl SignalRegistry {
    /// Lays out `groups` in order.
    pub fn new(groups: &[SignalGroup]) -> Result<Self, CaptureError> {
        let mut entries: Vec<SignalEntry> = Vec::new();
        let mut offset = 0u32;
        for group in groups {
            for signal in &group.signals {
                if signal.width == 0 || signal.width > MAX_SIGNAL_WIDTH {
                    return Err(CaptureError::InvalidWidth {
                        signal: signal.name.clone(),
                        width: signal.width,
                    });
                }
                if entries.iter().any(|e| e.name == signal.name) {
                    return Err(CaptureError::DuplicateSignal(signal.name.clone()));
                }
                entries.push(SignalEntry {
                    name: signal.name.clone(),
                    width: signal.width,
                    group: group.name.clone(),
                    offset,
                });
                offset += signal.width;
            }
        }
        if entries.is_empty() {
            return Err(CaptureError::EmptyRegistry);
        }
        Ok(Self {
            entries,
            width: offset,
        })
    }

    /// Lays out the groups named in `selection`, in selection order. An
    /// empty selection takes every group of `available`.
    pub fn select(available: &[SignalGroup], selection: &[String]) -> Result<Self, CaptureError> {
        if selection.is_empty() {
            return Self::new(available);
        }
        let groups = selection
            .iter()
            .map(|name| {
                available
                    .iter()
                    .find(|g| &g.name == name)
                    .cloned()
                    .ok_or_else(|| CaptureError::UnknownGroup(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&groups)
    }

    /// Returns the entries in layout order.
    pub fn entries(&self) -> &[SignalEntry] {
        &self.entries
    }

    /// Returns the index and entry of the named signal.
    pub fn find(&self, name: &str) -> Option<(usize, &SignalEntry)> {
        self.entries.iter().enumerate().find(|(_, e)| e.name == name)
    }

    /// Returns the total sample width in bits.
    pub fn sample_width(&self) -> u32 {
        self.width
    }

    /// Returns the number of 32-bit words one sample occupies.
    pub fn words_per_sample(&self) -> usize {
        self.width.div_ceil(32) as usize
    }

    /// Builds a sample by looking up each signal's value. Unknown names read
    /// as zero; values are truncated to the signal width.
    pub fn sample(&self, mut lookup: impl FnMut(&str) -> Option<u64>) -> Sample {
        let values = self
            .entries
            .iter()
            .map(|e| lookup(&e.name).unwrap_or(0) & e.mask())
            .collect();
        Sample { values }
    }

    /// Packs a sample into its storage words.
    pub fn pack(&self, sample: &Sample) -> Vec<u32> {
        let mut words = vec![0u32; self.words_per_sample()];
        for (entry, &value) in self.entries.iter().zip(&sample.values) {
            for bit in 0..entry.width {
                if value >> bit & 1 == 1 {
                    let pos = entry.offset + bit;
                    words[(pos / 32) as usize] |= 1 << (pos % 32);
                }
            }
        }
        words
    }

    /// Unpacks storage words into a sample. Missing words read as zero.
    pub fn unpack(&self, words: &[u32]) -> Sample {
        let values = self
            .entries
            .iter()
            .map(|entry| {
                (0..entry.width).fold(0u64, |acc, bit| {
                    let pos = entry.offset + bit;
                    let word = words.get((pos / 32) as usize).copied().unwrap_or(0);
                    acc | (u64::from(word >> (pos % 32) & 1) << bit)
                })
            })
            .collect();
        Sample { values }
    }

    /// Returns the named signal's value in `sample`.
    pub fn value(&self, sample: &Sample, name: &str) -> Option<u64> {
        self.find(name).and_then(|(i, _)| sample.get(i))
    }
}
