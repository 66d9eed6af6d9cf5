//! `swiftpack provides` and `swiftpack requires` commands

use anyhow::Result;

use crate::cli::{GlobalArgs, ProvidesArgs, RequiresArgs};
use swiftpack::core::PackageUrl;
use swiftpack::ops::{provides_command, requires_command, run_generator};
use swiftpack::util::SystemRunner;

pub fn execute_provides(global: &GlobalArgs, args: ProvidesArgs) -> Result<()> {
    let config = super::config(global);
    let url = PackageUrl::https(&args.url);
    let files = super::file_list(args.files)?;

    let cmd = provides_command(&config.rpmconfigdir(), &url, &args.version);
    for line in run_generator(cmd, &files, &SystemRunner)? {
        println!("{}", line);
    }
    Ok(())
}

pub fn execute_requires(global: &GlobalArgs, args: RequiresArgs) -> Result<()> {
    let ctx = super::package_context(global)?;
    let files = super::file_list(args.files)?;

    let cmd = requires_command(&ctx.config.rpmconfigdir(), &ctx.pipeline.build_dir);
    for line in run_generator(cmd, &files, &SystemRunner)? {
        println!("{}", line);
    }
    Ok(())
}
