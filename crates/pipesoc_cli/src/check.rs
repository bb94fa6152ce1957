//! `pipesoc check`: validate the configuration and print the clock plan.

use std::fmt::Write as _;

use pipesoc_clock::{ClockPlan, ClockSource};
use pipesoc_config::ValidatedConfig;
use pipesoc_soc::SocBuilder;

use crate::{pipeline, GlobalArgs, SocOverrides};

/// Runs `pipesoc check`. Assembly errors propagate as the command error.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::load(global, &SocOverrides::default())?;
    let system = SocBuilder::new(config).build()?;
    if !global.quiet {
        print!("{}", render_plan(system.config(), system.plan()));
    }
    Ok(0)
}

/// Renders the board selection and the solved clock plan as a table.
pub fn render_plan(config: &ValidatedConfig, plan: &ClockPlan) -> String {
    let pins = config.connector_pins();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "board      {} ({}, channel {})",
        config.board().name,
        pins.connector,
        pins.channel
    );
    let _ = writeln!(out, "reference  {} {}", plan.reference.pin, plan.reference.frequency);
    let _ = writeln!(
        out,
        "pll        {} div {} mult {} vco {}",
        plan.primitive, plan.pll.input_div, plan.pll.feedback_mult, plan.pll.vco
    );
    let _ = writeln!(out, "{:<10} {:<12} {:<13} source", "domain", "frequency", "reset");
    for domain in &plan.domains {
        let source = match domain.source {
            ClockSource::Reference => "reference".to_string(),
            ClockSource::Pll { output } => match plan.pll.outputs.get(output) {
                Some(out) => format!("pll /{}", out.divider),
                None => format!("pll #{output}"),
            },
        };
        let _ = writeln!(
            out,
            "{:<10} {:<12} {:<13} {source}",
            domain.name,
            domain.frequency.to_string(),
            domain.reset.to_string()
        );
    }
    out
}
