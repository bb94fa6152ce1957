//! `pipesoc build`: assemble the system and write its artifacts.

use pipesoc_soc::SocBuilder;

use crate::{pipeline, BuildArgs, GlobalArgs};

/// Runs `pipesoc build`.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::load(global, &args.overrides)?;
    let system = SocBuilder::new(config).build()?;
    let written = system.artifacts()?.write_to(&args.output_dir)?;

    if !global.quiet {
        let config = system.config();
        eprintln!(
            "   Assembled {} ({}) with {} clock domains and {} bus endpoints",
            config.board().name,
            config.connector(),
            system.plan().domains.len(),
            system.csr_map().endpoints().len()
        );
        for path in &written {
            eprintln!("       Wrote {}", path.display());
        }
    }
    Ok(0)
}
