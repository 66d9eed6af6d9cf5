//! `swiftpack classify` command

use anyhow::Result;

use crate::cli::{ClassifyArgs, GlobalArgs};
use swiftpack::core::ModuleKind;
use swiftpack::util::SystemRunner;

pub fn execute(global: &GlobalArgs, args: ClassifyArgs) -> Result<()> {
    let ctx = super::package_context(global)?;
    let classification = ctx.classify(&SystemRunner)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
        return Ok(());
    }

    if let Some(kind) = args.kind {
        println!("{}", classification.of_kind(kind).join(" "));
        return Ok(());
    }

    for kind in ModuleKind::ALL {
        println!("{}: {}", kind, classification.of_kind(kind).join(" "));
    }

    Ok(())
}
