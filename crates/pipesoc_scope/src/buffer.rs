//! The capture state machine and sample storage.
//!
//! ```text
//!   Idle --arm--> Armed --trigger--> Capturing --depth reached--> Full
//!    ^                                                             |
//!    +------------------------------ arm --------------------------+
//! ```
//!
//! While armed, the most recent `pre_trigger` samples are retained,
//! overwriting the oldest. The triggering sample and those following it are
//! appended until `depth` samples are stored; the buffer then halts in
//! `Full` and ignores further samples until re-armed.

use crate::error::CaptureError;
use crate::signal::{Sample, SignalRegistry};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Capture progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    /// Not collecting.
    Idle,
    /// Waiting for the trigger, keeping the pre-trigger window.
    Armed,
    /// Triggered, storing samples.
    Capturing,
    /// `depth` samples stored; halted.
    Full,
}

impl CaptureState {
    /// Encoding in the `STATE` register.
    pub fn code(self) -> u32 {
        match self {
            CaptureState::Idle => 0,
            CaptureState::Armed => 1,
            CaptureState::Capturing => 2,
            CaptureState::Full => 3,
        }
    }

    /// Decodes a `STATE` register value.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(CaptureState::Idle),
            1 => Some(CaptureState::Armed),
            2 => Some(CaptureState::Capturing),
            3 => Some(CaptureState::Full),
            _ => None,
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaptureState::Idle => "idle",
            CaptureState::Armed => "armed",
            CaptureState::Capturing => "capturing",
            CaptureState::Full => "full",
        };
        f.write_str(s)
    }
}

/// What starts a capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Only a bus write to `TRIGGER`.
    Manual,
    /// A sample whose `signal` equals `value`, or a bus write.
    Match {
        /// Signal name.
        signal: String,
        /// Value to match.
        value: u64,
    },
}

/// Capture parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Total samples stored per capture.
    pub depth: usize,
    /// Samples kept from before the trigger, part of `depth`.
    pub pre_trigger: usize,
    /// Trigger condition.
    pub trigger: Trigger,
}

/// Resolved trigger condition.
#[derive(Clone, Copy, Debug)]
enum Condition {
    Manual,
    Match { index: usize, value: u64 },
}

/// A triggered capture of registry samples.
#[derive(Clone, Debug)]
pub struct CaptureBuffer {
    registry: SignalRegistry,
    depth: usize,
    pre_trigger: usize,
    condition: Condition,
    state: CaptureState,
    samples: VecDeque<Sample>,
    force: bool,
}

impl CaptureBuffer {
    /// Creates an idle buffer. The trigger signal must exist in `registry`
    /// and its value must fit the signal.
    pub fn new(registry: SignalRegistry, settings: CaptureSettings) -> Result<Self, CaptureError> {
        if settings.depth == 0 {
            return Err(CaptureError::Settings("depth must be at least 1".into()));
        }
        if settings.pre_trigger >= settings.depth {
            return Err(CaptureError::Settings(format!(
                "pre_trigger ({}) must be smaller than depth ({})",
                settings.pre_trigger, settings.depth
            )));
        }
        let condition = match &settings.trigger {
            Trigger::Manual => Condition::Manual,
            Trigger::Match { signal, value } => {
                let (index, entry) = registry
                    .find(signal)
                    .ok_or_else(|| CaptureError::UnknownSignal(signal.clone()))?;
                if !entry.fits(*value) {
                    return Err(CaptureError::TriggerValueTooWide {
                        signal: signal.clone(),
                        value: *value,
                        width: entry.width,
                    });
                }
                Condition::Match {
                    index,
                    value: *value,
                }
            }
        };
        Ok(Self {
            registry,
            depth: settings.depth,
            pre_trigger: settings.pre_trigger,
            condition,
            state: CaptureState::Idle,
            samples: VecDeque::with_capacity(settings.depth),
            force: false,
        })
    }

    /// Returns the registry samples are laid out by.
    pub fn registry(&self) -> &SignalRegistry {
        &self.registry
    }

    /// Returns the current state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Returns the configured depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of samples currently stored.
    pub fn level(&self) -> usize {
        self.samples.len()
    }

    /// Clears storage and waits for the trigger. Ignored while a capture is
    /// in progress.
    pub fn arm(&mut self) {
        if matches!(self.state, CaptureState::Idle | CaptureState::Full) {
            self.samples.clear();
            self.force = false;
            self.state = CaptureState::Armed;
            tracing::debug!(depth = self.depth, pre_trigger = self.pre_trigger, "capture armed");
        }
    }

    /// Triggers on the next sample. Only effective while armed.
    pub fn force_trigger(&mut self) {
        if self.state == CaptureState::Armed {
            self.force = true;
        }
    }

    /// Offers one sample, once per active cycle of the observed domain.
    pub fn clock(&mut self, sample: &Sample) {
        match self.state {
            CaptureState::Idle | CaptureState::Full => {}
            CaptureState::Armed => {
                if self.force || self.matches(sample) {
                    self.force = false;
                    self.state = CaptureState::Capturing;
                    tracing::info!(pre_trigger = self.samples.len(), "capture triggered");
                    self.store(sample);
                } else if self.pre_trigger > 0 {
                    if self.samples.len() == self.pre_trigger {
                        self.samples.pop_front();
                    }
                    self.samples.push_back(sample.clone());
                }
            }
            CaptureState::Capturing => self.store(sample),
        }
    }

    fn matches(&self, sample: &Sample) -> bool {
        match self.condition {
            Condition::Manual => false,
            Condition::Match { index, value } => sample.get(index) == Some(value),
        }
    }

    fn store(&mut self, sample: &Sample) {
        self.samples.push_back(sample.clone());
        if self.samples.len() >= self.depth {
            self.state = CaptureState::Full;
            tracing::info!(samples = self.samples.len(), "capture full");
        }
    }

    /// Iterates the stored samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Returns the stored samples packed into words, oldest first.
    pub fn words(&self) -> Vec<u32> {
        self.samples
            .iter()
            .flat_map(|s| self.registry.pack(s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{ProbeSignal, SignalGroup};

    fn registry() -> SignalRegistry {
        SignalRegistry::new(&[SignalGroup::new(
            "bench",
            vec![ProbeSignal::new("count", 16), ProbeSignal::new("flag", 1)],
        )])
        .unwrap()
    }

    fn buffer(depth: usize, pre_trigger: usize, trigger: Trigger) -> CaptureBuffer {
        CaptureBuffer::new(
            registry(),
            CaptureSettings {
                depth,
                pre_trigger,
                trigger,
            },
        )
        .unwrap()
    }

    fn sample(reg: &SignalRegistry, count: u64, flag: bool) -> Sample {
        reg.sample(|name| match name {
            "count" => Some(count),
            "flag" => Some(u64::from(flag)),
            _ => None,
        })
    }

    fn counts(buf: &CaptureBuffer) -> Vec<u64> {
        buf.samples().map(|s| s.get(0).unwrap_or(0)).collect()
    }

    #[test]
    fn idle_ignores_samples() {
        let mut buf = buffer(4, 0, Trigger::Manual);
        let reg = registry();
        buf.clock(&sample(&reg, 1, false));
        buf.force_trigger();
        assert_eq!(buf.state(), CaptureState::Idle);
        assert_eq!(buf.level(), 0);
    }

    #[test]
    fn manual_trigger_captures_depth_samples() {
        let reg = registry();
        let mut buf = buffer(4, 0, Trigger::Manual);
        buf.arm();
        buf.clock(&sample(&reg, 0, false));
        assert_eq!(buf.level(), 0);
        buf.force_trigger();
        for i in 1..=4 {
            buf.clock(&sample(&reg, i, false));
        }
        assert_eq!(buf.state(), CaptureState::Full);
        assert_eq!(counts(&buf), [1, 2, 3, 4]);
    }

    #[test]
    fn long_window_stores_first_depth_samples_and_halts() {
        let reg = registry();
        let mut buf = buffer(8, 0, Trigger::Manual);
        buf.arm();
        buf.force_trigger();
        for i in 0..100 {
            buf.clock(&sample(&reg, i, false));
        }
        assert_eq!(buf.state(), CaptureState::Full);
        assert_eq!(counts(&buf), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn match_trigger_keeps_pre_trigger_window() {
        let reg = registry();
        let mut buf = buffer(
            6,
            2,
            Trigger::Match {
                signal: "flag".into(),
                value: 1,
            },
        );
        buf.arm();
        for i in 0..10 {
            buf.clock(&sample(&reg, i, false));
        }
        assert_eq!(buf.level(), 2);
        assert_eq!(buf.state(), CaptureState::Armed);
        buf.clock(&sample(&reg, 10, true));
        assert_eq!(buf.state(), CaptureState::Capturing);
        for i in 11..20 {
            buf.clock(&sample(&reg, i, false));
        }
        assert_eq!(counts(&buf), [8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn rearm_from_full_clears_storage() {
        let reg = registry();
        let mut buf = buffer(1, 0, Trigger::Manual);
        buf.arm();
        buf.force_trigger();
        buf.clock(&sample(&reg, 5, false));
        assert_eq!(buf.state(), CaptureState::Full);
        buf.arm();
        assert_eq!(buf.state(), CaptureState::Armed);
        assert_eq!(buf.level(), 0);
    }

    #[test]
    fn arm_ignored_while_capturing() {
        let reg = registry();
        let mut buf = buffer(4, 0, Trigger::Manual);
        buf.arm();
        buf.force_trigger();
        buf.clock(&sample(&reg, 1, false));
        buf.arm();
        assert_eq!(buf.state(), CaptureState::Capturing);
        assert_eq!(buf.level(), 1);
    }

    #[test]
    fn trigger_validation() {
        let bad_signal = CaptureBuffer::new(
            registry(),
            CaptureSettings {
                depth: 4,
                pre_trigger: 0,
                trigger: Trigger::Match {
                    signal: "nope".into(),
                    value: 0,
                },
            },
        );
        assert!(matches!(bad_signal.unwrap_err(), CaptureError::UnknownSignal(_)));

        let too_wide = CaptureBuffer::new(
            registry(),
            CaptureSettings {
                depth: 4,
                pre_trigger: 0,
                trigger: Trigger::Match {
                    signal: "flag".into(),
                    value: 2,
                },
            },
        );
        assert!(matches!(
            too_wide.unwrap_err(),
            CaptureError::TriggerValueTooWide { width: 1, .. }
        ));

        let bad_window = CaptureBuffer::new(
            registry(),
            CaptureSettings {
                depth: 4,
                pre_trigger: 4,
                trigger: Trigger::Manual,
            },
        );
        assert!(matches!(bad_window.unwrap_err(), CaptureError::Settings(_)));
    }

    #[test]
    fn state_codes_roundtrip() {
        for state in [
            CaptureState::Idle,
            CaptureState::Armed,
            CaptureState::Capturing,
            CaptureState::Full,
        ] {
            assert_eq!(CaptureState::from_code(state.code()), Some(state));
        }
        assert_eq!(CaptureState::from_code(9), None);
    }
}
