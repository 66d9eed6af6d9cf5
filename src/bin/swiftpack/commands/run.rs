//! `swiftpack run` command

use anyhow::Result;

use crate::cli::{GlobalArgs, RunArgs};
use swiftpack::builder::StageKind;
use swiftpack::ops::{build, BuildOptions};
use swiftpack::util::SystemRunner;

pub fn execute(global: &GlobalArgs, args: RunArgs) -> Result<()> {
    let installs = args.stages.is_empty()
        || args.stages.iter().any(|stage| *stage != StageKind::Build);
    let ctx = if installs {
        super::staging_context(global)?
    } else {
        super::package_context(global)?
    };

    let opts = BuildOptions {
        stages: args.stages,
        embed: args.embed.request(),
        package_name: args.name,
    };

    let result = build(&ctx, &opts, &SystemRunner)?;
    super::print_installed(&ctx, &result.report.installed);

    let completed: Vec<&str> = result.report.completed.iter().map(|s| s.as_str()).collect();
    eprintln!("    Finished {}", completed.join(", "));
    Ok(())
}
