//! Provides/requires metadata generators.
//!
//! Packaging tools hand the generators a list of installed files on stdin
//! and read capability names back from stdout, one per line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::package_url::PackageUrl;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Provides generator script name.
pub const PROVIDES_SCRIPT: &str = "swift.prov";

/// Requires generator script name.
pub const REQUIRES_SCRIPT: &str = "swift.req";

/// `<rpmconfigdir>/swift.prov <url> <version>`
pub fn provides_command(rpmconfigdir: &Path, url: &PackageUrl, version: &str) -> ProcessBuilder {
    ProcessBuilder::new(rpmconfigdir.join(PROVIDES_SCRIPT))
        .arg(url.as_str())
        .arg(version)
}

/// `<rpmconfigdir>/swift.req <build_dir>`
pub fn requires_command(rpmconfigdir: &Path, build_dir: &Path) -> ProcessBuilder {
    ProcessBuilder::new(rpmconfigdir.join(REQUIRES_SCRIPT)).arg(build_dir)
}

/// Feed `files` to a generator and collect the non-empty output lines.
pub fn run_generator(
    cmd: ProcessBuilder,
    files: &[PathBuf],
    runner: &dyn CommandRunner,
) -> Result<Vec<String>> {
    let mut input = String::new();
    for file in files {
        input.push_str(&file.display().to_string());
        input.push('\n');
    }

    let cmd = cmd.stdin(input);
    let output = runner
        .run_checked(&cmd)
        .with_context(|| format!("generator `{}` failed", cmd.get_program().display()))?;

    Ok(output
        .stdout_str()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
