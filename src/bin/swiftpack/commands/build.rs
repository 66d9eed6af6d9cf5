//! `swiftpack build` command

use anyhow::Result;

use crate::cli::{BuildArgs, GlobalArgs};
use swiftpack::builder::StageKind;
use swiftpack::ops::{build, BuildOptions};
use swiftpack::util::SystemRunner;

pub fn execute(global: &GlobalArgs, args: BuildArgs) -> Result<()> {
    let ctx = super::package_context(global)?;

    let opts = BuildOptions {
        stages: vec![StageKind::Build],
        embed: args.embed.request(),
        package_name: args.name,
    };

    let result = build(&ctx, &opts, &SystemRunner)?;

    if let Some(link) = result.link_name {
        eprintln!(
            "    Finished `{}` -> {}",
            link,
            ctx.pipeline.build_dir.display()
        );
    }
    Ok(())
}
