//! `swiftpack install` and `swiftpack install-devel` commands

use anyhow::Result;

use crate::cli::GlobalArgs;
use swiftpack::builder::StageKind;
use swiftpack::ops::{build, BuildOptions};
use swiftpack::util::SystemRunner;

pub fn execute_runtime(global: &GlobalArgs) -> Result<()> {
    install(global, StageKind::InstallRuntime)
}

pub fn execute_devel(global: &GlobalArgs) -> Result<()> {
    install(global, StageKind::InstallDevel)
}

fn install(global: &GlobalArgs, stage: StageKind) -> Result<()> {
    let ctx = super::staging_context(global)?;

    let opts = BuildOptions {
        stages: vec![stage],
        ..Default::default()
    };

    let result = build(&ctx, &opts, &SystemRunner)?;
    super::print_installed(&ctx, &result.report.installed);
    Ok(())
}
