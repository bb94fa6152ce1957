//! Deterministic ordering of rising clock edges across domains.
//!
//! Time is kept in femtoseconds. Each registered domain has a fixed period;
//! its first rising edge falls one period after time zero. Edges that
//! coincide are reported together, in domain registration order.

use pipesoc_common::DomainId;
use std::fmt;

/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;

/// The rising edges occurring at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeSet {
    /// Time of the edges in femtoseconds.
    pub time_fs: u64,
    /// Domains with a rising edge at `time_fs`, in registration order.
    pub domains: Vec<DomainId>,
}

impl EdgeSet {
    /// Returns true if `domain` has an edge in this set.
    pub fn contains(&self, domain: DomainId) -> bool {
        self.domains.contains(&domain)
    }
}

impl fmt::Display for EdgeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}ns", self.time_fs / FS_PER_NS, self.time_fs % FS_PER_NS)
    }
}

#[derive(Clone, Debug)]
struct DomainClock {
    id: DomainId,
    period_fs: u64,
    next_fs: u64,
}

/// Produces the rising edges of every registered domain in time order.
#[derive(Clone, Debug, Default)]
pub struct EdgeScheduler {
    clocks: Vec<DomainClock>,
    now_fs: u64,
}

impl EdgeScheduler {
    /// Creates an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a domain with the given period. A zero period is treated
    /// as one femtosecond.
    pub fn register(&mut self, id: DomainId, period_fs: u64) {
        let period_fs = period_fs.max(1);
        self.clocks.push(DomainClock {
            id,
            period_fs,
            next_fs: self.now_fs + period_fs,
        });
    }

    /// Returns the time of the most recent edge set.
    pub fn now_fs(&self) -> u64 {
        self.now_fs
    }

    /// Returns the period of a registered domain.
    pub fn period_fs(&self, id: DomainId) -> Option<u64> {
        self.clocks.iter().find(|c| c.id == id).map(|c| c.period_fs)
    }

    /// Advances to the next point in time with at least one edge.
    ///
    /// Returns `None` only when no domain is registered.
    pub fn advance(&mut self) -> Option<EdgeSet> {
        let time_fs = self.clocks.iter().map(|c| c.next_fs).min()?;
        let mut domains = Vec::new();
        for clock in &mut self.clocks {
            if clock.next_fs == time_fs {
                domains.push(clock.id);
                clock.next_fs += clock.period_fs;
            }
        }
        self.now_fs = time_fs;
        Some(EdgeSet { time_fs, domains })
    }
}
