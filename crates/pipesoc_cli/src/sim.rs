//! `pipesoc sim`: run bring-up in the cycle-level model.
//!
//! With debug capture enabled the capture is armed before the first edge; a
//! capture without a configured trigger is triggered immediately. A full
//! capture is dumped as VCD when `--vcd` is given.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use pipesoc_scope::{CaptureReader, CaptureState, VcdWriter};
use pipesoc_soc::{SimError, SocBuilder, System};

use crate::{pipeline, GlobalArgs, SimArgs};

/// Milestones observed during a run, in `sys` cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BringUp {
    /// First cycle the serializer reported ready.
    pub serializer_ready: Option<u64>,
    /// First cycle the link reported ready.
    pub link_ready: Option<u64>,
}

/// Runs `pipesoc sim`. Exits 1 if the link is not up at the end.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::load(global, &args.overrides)?;
    let manual_trigger = config.debug_capture() && config.capture().trigger.is_none();
    let mut system = SocBuilder::new(config).build()?;

    let reader = system.capture_reader();
    if let Some(ref reader) = reader {
        reader.arm(&mut system)?;
        if manual_trigger {
            reader.trigger(&mut system)?;
        }
    }

    let bring_up = simulate(&mut system, args.cycles)?;
    let leds = system.leds();
    let link_up = system.link().ready();

    if !global.quiet {
        eprintln!(
            "   Simulated {} sys cycles ({} ns)",
            system.sys_cycles(),
            system.now_fs() / 1_000_000
        );
        eprintln!("  Serializer {}", milestone(bring_up.serializer_ready));
        eprintln!("        Link {}", milestone(bring_up.link_ready));
        eprintln!(
            "        LEDs led0={} led1={}",
            u8::from(leds.led0),
            u8::from(leds.led1)
        );
    }

    match (&reader, &args.vcd) {
        (Some(reader), Some(path)) => dump_capture(&mut system, reader, path, global)?,
        (None, Some(_)) => {
            tracing::warn!("--vcd ignored: debug capture is not enabled (use --with-analyzer)");
        }
        _ => {}
    }

    Ok(if link_up { 0 } else { 1 })
}

/// Steps `cycles` `sys` edges, recording when each subsystem came up.
pub fn simulate(system: &mut System, cycles: u64) -> Result<BringUp, SimError> {
    let mut bring_up = BringUp::default();
    for _ in 0..cycles {
        system.run(1)?;
        let now = system.sys_cycles();
        if system.serializer().ready() {
            bring_up.serializer_ready.get_or_insert(now);
        }
        if system.link().ready() {
            bring_up.link_ready.get_or_insert(now);
        }
    }
    Ok(bring_up)
}

fn milestone(cycle: Option<u64>) -> String {
    match cycle {
        Some(cycle) => format!("ready at sys cycle {cycle}"),
        None => "not ready".to_string(),
    }
}

fn dump_capture(
    system: &mut System,
    reader: &CaptureReader,
    path: &Path,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = reader.state(system)?;
    if state != CaptureState::Full {
        tracing::warn!(%state, "capture not complete, no VCD written");
        return Ok(());
    }
    let samples = reader.read_samples(system)?;
    let file = BufWriter::new(File::create(path)?);
    VcdWriter::new(file).write_capture(reader.registry(), &samples, system.sys_period_fs())?;
    if !global.quiet {
        eprintln!("       Wrote {} ({} samples)", path.display(), samples.len());
    }
    Ok(())
}
