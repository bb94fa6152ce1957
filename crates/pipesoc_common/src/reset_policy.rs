//! Reset discipline of a clock domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a clock domain's registers respond to the domain reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Reset is sampled on the domain's clock edge.
    #[default]
    Synchronous,
    /// Reset acts immediately, release is synchronized to the domain clock.
    Asynchronous,
    /// The domain has no reset; registers only hold their power-on value.
    ResetLess,
}

impl ResetPolicy {
    /// Returns true if the domain carries a reset signal at all.
    pub fn has_reset(self) -> bool {
        !matches!(self, ResetPolicy::ResetLess)
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResetPolicy::Synchronous => "synchronous",
            ResetPolicy::Asynchronous => "asynchronous",
            ResetPolicy::ResetLess => "reset_less",
        };
        f.write_str(s)
    }
}
