//! The clock domain generator: turns named frequency requests into a solved
//! clock plan.
//!
//! Requests are recorded in order and checked only by [`ClockDomainGenerator::build`],
//! so a plan either comes out complete, with every domain and constraint, or
//! not at all. The reset-less `por` domain on the reference input is always
//! the first domain of a plan.

use crate::constraints::{ClockConstraint, ClockTarget, ConstraintSet};
use crate::domain::{ClockDomain, ClockInput, ClockSource};
use crate::error::ClockError;
use crate::expr::FrequencyExpr;
use crate::pll::{solve, PllConfig, PllLimits, PllRequest};
use pipesoc_common::{DomainId, Frequency, ResetPolicy};
use pipesoc_config::{ValidatedConfig, POR_DOMAIN};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug)]
struct Request {
    name: String,
    expr: String,
    reset: ResetPolicy,
}

/// Collects domain requests for one PLL fed by one reference input.
#[derive(Clone, Debug)]
pub struct ClockDomainGenerator {
    reference: ClockInput,
    limits: PllLimits,
    requests: Vec<Request>,
}

impl ClockDomainGenerator {
    /// Creates a generator for `reference` using a PLL with `limits`.
    pub fn new(reference: ClockInput, limits: PllLimits) -> Self {
        Self {
            reference,
            limits,
            requests: Vec::new(),
        }
    }

    /// Creates a generator preloaded with the board's reference, PLL family
    /// and the merged domain requests of a validated configuration.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let board = config.board();
        let mut generator = Self::new(
            ClockInput::new(board.reference_pin, board.reference()),
            PllLimits::for_family(board.pll),
        );
        for domain in config.domains() {
            generator.request(&domain.name, &domain.frequency, domain.reset);
        }
        generator
    }

    /// Requests a domain. `frequency` is an absolute value such as `125MHz`
    /// or a ratio of an earlier request such as `sys/8`.
    pub fn request(&mut self, name: &str, frequency: &str, reset: ResetPolicy) -> &mut Self {
        self.requests.push(Request {
            name: name.to_string(),
            expr: frequency.to_string(),
            reset,
        });
        self
    }

    /// Resolves every request, solves the PLL and registers the period
    /// constraints.
    pub fn build(&self) -> Result<ClockPlan, ClockError> {
        let targets = self.resolve_targets()?;
        let pll = solve(&self.limits, self.reference.frequency, &targets)?;

        let mut domains = Vec::with_capacity(pll.outputs.len() + 1);
        domains.push(ClockDomain {
            id: DomainId::from_raw(0),
            name: POR_DOMAIN.to_string(),
            frequency: self.reference.frequency,
            reset: ResetPolicy::ResetLess,
            source: ClockSource::Reference,
        });
        for (index, (output, request)) in pll.outputs.iter().zip(&self.requests).enumerate() {
            domains.push(ClockDomain {
                id: DomainId::from_raw(domains.len() as u32),
                name: output.name.clone(),
                frequency: output.achieved,
                reset: request.reset,
                source: ClockSource::Pll { output: index },
            });
        }

        let mut constraints = ConstraintSet::new();
        constraints.register(ClockConstraint {
            name: self.reference.pin.clone(),
            period_ns: self.reference.frequency.period_ns(),
            target: ClockTarget::Port(self.reference.pin.clone()),
        })?;
        for domain in domains.iter().filter(|d| d.is_derived()) {
            constraints.register(ClockConstraint {
                name: domain.name.clone(),
                period_ns: domain.frequency.period_ns(),
                target: ClockTarget::Net(domain.clock_net()),
            })?;
        }

        for domain in &domains {
            tracing::debug!(
                domain = %domain.name,
                frequency = %domain.frequency,
                reset = %domain.reset,
                "clock domain planned"
            );
        }

        Ok(ClockPlan {
            reference: self.reference.clone(),
            primitive: self.limits.primitive,
            pll,
            domains,
            constraints,
        })
    }

    fn resolve_targets(&self) -> Result<Vec<PllRequest>, ClockError> {
        let mut resolved: HashMap<&str, Frequency> = HashMap::new();
        let mut targets = Vec::with_capacity(self.requests.len());

        for request in &self.requests {
            if request.name == POR_DOMAIN || resolved.contains_key(request.name.as_str()) {
                return Err(ClockError::DuplicateDomain(request.name.clone()));
            }
            let expr: FrequencyExpr =
                request
                    .expr
                    .parse()
                    .map_err(|()| ClockError::InvalidExpression {
                        domain: request.name.clone(),
                        expr: request.expr.clone(),
                    })?;
            let target = expr
                .resolve(|base| resolved.get(base).copied())
                .ok_or_else(|| match &expr {
                    FrequencyExpr::Ratio { base, .. } => ClockError::UnknownBase {
                        domain: request.name.clone(),
                        base: base.clone(),
                    },
                    FrequencyExpr::Absolute(_) => ClockError::InvalidExpression {
                        domain: request.name.clone(),
                        expr: request.expr.clone(),
                    },
                })?;
            resolved.insert(&request.name, target);
            targets.push(PllRequest {
                name: request.name.clone(),
                target,
            });
        }
        Ok(targets)
    }
}

/// A solved set of clock domains with their PLL configuration and period
/// constraints.
#[derive(Clone, Debug, Serialize)]
pub struct ClockPlan {
    /// Board reference input.
    pub reference: ClockInput,
    /// PLL primitive the plan targets.
    pub primitive: &'static str,
    /// Solved PLL configuration.
    pub pll: PllConfig,
    /// Domains: `por` first, then PLL outputs in request order.
    pub domains: Vec<ClockDomain>,
    /// One period constraint per clock.
    pub constraints: ConstraintSet,
}

impl ClockPlan {
    /// Plans the clocks of a validated configuration.
    pub fn from_config(config: &ValidatedConfig) -> Result<Self, ClockError> {
        ClockDomainGenerator::from_config(config).build()
    }

    /// Returns the named domain.
    pub fn domain(&self, name: &str) -> Option<&ClockDomain> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Returns the domain with the given id.
    pub fn get(&self, id: DomainId) -> Option<&ClockDomain> {
        self.domains.get(id.index())
    }

    /// Returns the reset-less power-on domain.
    pub fn por_domain(&self) -> &ClockDomain {
        &self.domains[0]
    }

    /// Iterates the PLL-derived domains.
    pub fn derived(&self) -> impl Iterator<Item = &ClockDomain> {
        self.domains.iter().filter(|d| d.is_derived())
    }
}
