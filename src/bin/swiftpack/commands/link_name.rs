//! `swiftpack link-name` command

use anyhow::Result;

use crate::cli::{GlobalArgs, LinkNameArgs};
use swiftpack::core::LinkName;
use swiftpack::util::SystemRunner;

pub fn execute(global: &GlobalArgs, args: LinkNameArgs) -> Result<()> {
    let link = match args.name {
        Some(ref name) => LinkName::from_package_name(name)?,
        None => super::package_context(global)?.link_name(None, &SystemRunner)?,
    };

    println!("{}", link);
    Ok(())
}
