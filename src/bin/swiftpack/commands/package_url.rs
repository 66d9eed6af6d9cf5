//! `swiftpack package-url` command

use anyhow::Result;

use crate::cli::PackageUrlArgs;
use swiftpack::core::PackageUrl;

pub fn execute(args: PackageUrlArgs) -> Result<()> {
    let url = PackageUrl::https(&args.url);
    let url = if args.ssh { url.ssh()? } else { url };

    println!("{}", url);
    Ok(())
}
