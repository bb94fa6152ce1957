//! Power-on reset sequencing and clock-domain crossing primitives.
//!
//! The power-on counter lives in the reset-less `por` domain. Every other
//! domain receives its reset through a [`ResetSynchronizer`]: assertion is
//! immediate, release ripples through the stages one edge of the target
//! domain at a time. Single status bits cross with a [`BitSynchronizer`].

/// Power-on reset countdown.
///
/// `done` is false while the counter is non-zero. Each active cycle
/// decrements it by one; it never wraps and stays at zero until
/// [`reactivate`](PowerOnReset::reactivate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerOnReset {
    count: u32,
    initial: u32,
}

impl PowerOnReset {
    /// Creates an activated sequencer that completes after `initial` cycles.
    pub fn new(initial: u32) -> Self {
        Self {
            count: initial,
            initial,
        }
    }

    /// Advances one cycle of the reference clock.
    ///
    /// Returns true on the cycle the count reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        if self.count == 0 {
            tracing::info!(cycles = self.initial, "power-on reset done");
            return true;
        }
        false
    }

    /// Returns true once the countdown has completed.
    pub fn done(&self) -> bool {
        self.count == 0
    }

    /// Reloads the initial count.
    pub fn reactivate(&mut self) {
        self.count = self.initial;
    }

    /// Returns the remaining count.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the initial count.
    pub fn initial(&self) -> u32 {
        self.initial
    }
}

/// Asynchronous-assert, synchronous-release reset synchronizer.
///
/// Starts asserted. Only the last stage is visible to the target domain.
#[derive(Clone, Debug)]
pub struct ResetSynchronizer {
    stages: Vec<bool>,
    input: bool,
}

impl ResetSynchronizer {
    /// Default number of stages.
    pub const DEFAULT_STAGES: usize = 2;

    /// Creates a synchronizer with `stages` registers (at least one).
    pub fn new(stages: usize) -> Self {
        Self {
            stages: vec![true; stages.max(1)],
            input: true,
        }
    }

    /// Drives the asynchronous reset input. Assertion reaches the output
    /// immediately.
    pub fn drive(&mut self, reset: bool) {
        self.input = reset;
        if reset {
            self.stages.fill(true);
        }
    }

    /// Rising edge of the target domain: shifts the input one stage.
    pub fn clock(&mut self) {
        self.stages.rotate_right(1);
        self.stages[0] = self.input;
    }

    /// Returns the synchronized reset seen by the target domain.
    pub fn output(&self) -> bool {
        self.stages.last().copied().unwrap_or(true)
    }

    /// Returns the number of stages.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }
}

impl Default for ResetSynchronizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STAGES)
    }
}

/// Multi-stage register chain for a single-bit level crossing domains.
#[derive(Clone, Debug)]
pub struct BitSynchronizer {
    stages: Vec<bool>,
}

impl BitSynchronizer {
    /// Creates a synchronizer with `stages` registers (at least one), all low.
    pub fn new(stages: usize) -> Self {
        Self {
            stages: vec![false; stages.max(1)],
        }
    }

    /// Rising edge of the destination domain: samples `input`.
    pub fn clock(&mut self, input: bool) {
        self.stages.rotate_right(1);
        self.stages[0] = input;
    }

    /// Returns the synchronized level.
    pub fn output(&self) -> bool {
        self.stages.last().copied().unwrap_or(false)
    }
}

impl Default for BitSynchronizer {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- power-on reset --

    #[test]
    fn por_done_exactly_after_initial_cycles() {
        for initial in [1, 2, 7, 100] {
            let mut por = PowerOnReset::new(initial);
            for cycle in 0..initial {
                assert!(!por.done(), "done early at cycle {cycle} of {initial}");
                por.tick();
            }
            assert!(por.done());
            for _ in 0..10 {
                por.tick();
                assert!(por.done());
                assert_eq!(por.count(), 0);
            }
        }
    }

    #[test]
    fn por_zero_is_done_immediately() {
        let mut por = PowerOnReset::new(0);
        assert!(por.done());
        assert!(!por.tick());
    }

    #[test]
    fn por_tick_reports_completion_once() {
        let mut por = PowerOnReset::new(2);
        assert!(!por.tick());
        assert!(por.tick());
        assert!(!por.tick());
    }

    #[test]
    fn por_reactivation_restarts_count() {
        let mut por = PowerOnReset::new(3);
        for _ in 0..3 {
            por.tick();
        }
        assert!(por.done());
        por.reactivate();
        assert!(!por.done());
        assert_eq!(por.count(), 3);
        for _ in 0..3 {
            por.tick();
        }
        assert!(por.done());
    }

    #[test]
    fn por_count_strictly_decreases() {
        let mut por = PowerOnReset::new(5);
        let mut last = por.count();
        while !por.done() {
            por.tick();
            assert_eq!(por.count(), last - 1);
            last = por.count();
        }
    }

    // -- reset synchronizer --

    #[test]
    fn reset_starts_asserted_and_releases_after_depth_edges() {
        let mut sync = ResetSynchronizer::new(3);
        assert!(sync.output());
        sync.drive(false);
        sync.clock();
        assert!(sync.output());
        sync.clock();
        assert!(sync.output());
        sync.clock();
        assert!(!sync.output());
    }

    #[test]
    fn reset_asserts_without_an_edge() {
        let mut sync = ResetSynchronizer::default();
        sync.drive(false);
        sync.clock();
        sync.clock();
        assert!(!sync.output());
        sync.drive(true);
        assert!(sync.output());
    }

    #[test]
    fn short_release_glitch_does_not_reach_output() {
        let mut sync = ResetSynchronizer::new(2);
        sync.drive(false);
        sync.clock();
        sync.drive(true);
        sync.clock();
        sync.clock();
        assert!(sync.output());
    }

    // -- bit synchronizer --

    #[test]
    fn bit_crosses_after_stage_count_edges() {
        let mut sync = BitSynchronizer::new(2);
        sync.clock(true);
        assert!(!sync.output());
        sync.clock(true);
        assert!(sync.output());
        sync.clock(false);
        assert!(sync.output());
        sync.clock(false);
        assert!(!sync.output());
    }
}
