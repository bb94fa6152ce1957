//! Clock planning error types.
//!
//! Every variant is raised while planning, before any domain exists.

use pipesoc_common::Frequency;

/// Errors that can occur while planning clock domains.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// A frequency expression could not be parsed.
    #[error("invalid frequency expression '{expr}' for domain '{domain}'")]
    InvalidExpression {
        /// Domain the expression belongs to.
        domain: String,
        /// The offending expression.
        expr: String,
    },

    /// A relative expression names a domain that was not requested before it.
    #[error("domain '{domain}' is derived from unknown domain '{base}'")]
    UnknownBase {
        /// Domain being resolved.
        domain: String,
        /// The missing base domain.
        base: String,
    },

    /// Two requests share a name.
    #[error("clock domain '{0}' requested twice")]
    DuplicateDomain(String),

    /// A period constraint was registered twice for the same clock.
    #[error("period constraint for '{0}' registered twice")]
    DuplicateConstraint(String),

    /// The PLL has fewer outputs than requested domains.
    #[error("{requested} output clocks requested but the PLL provides {max}")]
    TooManyOutputs {
        /// Number of requested outputs.
        requested: usize,
        /// Number of outputs the PLL provides.
        max: usize,
    },

    /// The reference clock lies outside the PLL's input range.
    #[error("reference clock {reference} is outside the PLL input range {min}..{max}")]
    ReferenceOutOfRange {
        /// Reference frequency.
        reference: Frequency,
        /// Minimum accepted input.
        min: Frequency,
        /// Maximum accepted input.
        max: Frequency,
    },

    /// No single PLL configuration produces every requested frequency.
    #[error("no PLL configuration reaches all of {targets} from {reference}")]
    Unachievable {
        /// Reference frequency.
        reference: Frequency,
        /// Human-readable list of requested targets.
        targets: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unachievable() {
        let err = ClockError::Unachievable {
            reference: Frequency::from_mhz(100.0),
            targets: "sys=125MHz, odd=33.3MHz".into(),
        };
        assert_eq!(
            err.to_string(),
            "no PLL configuration reaches all of sys=125MHz, odd=33.3MHz from 100MHz"
        );
    }

    #[test]
    fn display_too_many_outputs() {
        let err = ClockError::TooManyOutputs {
            requested: 4,
            max: 3,
        };
        assert_eq!(
            err.to_string(),
            "4 output clocks requested but the PLL provides 3"
        );
    }
}
