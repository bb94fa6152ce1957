//! Frequency expressions: absolute values or ratios of another domain.

use pipesoc_common::Frequency;
use std::str::FromStr;

/// A requested domain frequency.
#[derive(Clone, Debug, PartialEq)]
pub enum FrequencyExpr {
    /// An absolute target, e.g. `125MHz`.
    Absolute(Frequency),
    /// `base * num / den`, e.g. `sys/8` or `sys*2`.
    Ratio {
        /// Name of the domain this one is derived from.
        base: String,
        /// Multiplier.
        num: u32,
        /// Divider.
        den: u32,
    },
}

impl FrequencyExpr {
    /// Resolves the expression, looking up relative bases with `lookup`.
    ///
    /// Returns `None` if the base domain is unknown.
    pub fn resolve(&self, lookup: impl Fn(&str) -> Option<Frequency>) -> Option<Frequency> {
        match self {
            FrequencyExpr::Absolute(f) => Some(*f),
            FrequencyExpr::Ratio { base, num, den } => lookup(base).map(|f| f.scaled(*num, *den)),
        }
    }
}

impl FromStr for FrequencyExpr {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(f) = s.parse::<Frequency>() {
            return Ok(FrequencyExpr::Absolute(f));
        }

        let (head, den) = match s.split_once('/') {
            Some((head, den)) => (head, parse_factor(den)?),
            None => (s, 1),
        };
        let (base, num) = match head.split_once('*') {
            Some((base, num)) => (base, parse_factor(num)?),
            None => (head, 1),
        };
        let base = base.trim();
        let valid_name = !base.is_empty()
            && base
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            && base.chars().next().is_some_and(|c| !c.is_ascii_digit());
        if !valid_name {
            return Err(());
        }
        Ok(FrequencyExpr::Ratio {
            base: base.to_string(),
            num,
            den,
        })
    }
}

fn parse_factor(s: &str) -> Result<u32, ()> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(()),
        Ok(v) => Ok(v),
    }
}
