//! `swiftpack patch` command

use anyhow::{bail, Result};

use crate::cli::{GlobalArgs, PatchArgs};
use swiftpack::ops::{patch, PatchOutcome};
use swiftpack::util::SystemRunner;

pub fn execute(global: &GlobalArgs, args: PatchArgs) -> Result<()> {
    let embed = args.embed.request();
    if !embed.is_active() {
        bail!(
            "nothing to patch\n\
             help: pass --embed <URL> or --embed-nothing"
        );
    }

    let ctx = super::package_context(global)?;
    let classification = ctx.classify(&SystemRunner)?;
    let link = ctx.link_name(args.name.as_deref(), &SystemRunner)?;

    match patch(&ctx, &embed, &link, &classification)? {
        PatchOutcome::Patched => eprintln!(
            "     Patched {} (product `{}`)",
            ctx.pipeline.manifest_path().display(),
            link
        ),
        PatchOutcome::AlreadyPatched | PatchOutcome::Unchanged => {}
    }

    Ok(())
}
