//! Command implementations

pub mod build;
pub mod classify;
pub mod generate;
pub mod install;
pub mod link_name;
pub mod package_url;
pub mod patch;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use swiftpack::ops::PackageContext;
use swiftpack::util::config::{global_config_path, load_config, project_config_path, Config};

/// Load the merged configuration for the selected package.
pub fn config(global: &GlobalArgs) -> Config {
    let mut config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&global.package_dir),
    );
    if let Some(ref path) = global.config {
        config.merge(Config::load_or_default(path));
    }
    config
}

/// Package context for commands that never install anything.
pub fn package_context(global: &GlobalArgs) -> Result<PackageContext> {
    let buildroot = global.buildroot.clone().unwrap_or_default();
    PackageContext::new(config(global), &global.package_dir, &buildroot)
}

/// Package context for commands that stage files; needs a staging root.
pub fn staging_context(global: &GlobalArgs) -> Result<PackageContext> {
    let buildroot = global.buildroot.clone().context(
        "no staging root given\n\
         help: pass --buildroot <DIR> or set RPM_BUILD_ROOT",
    )?;
    PackageContext::new(config(global), &global.package_dir, &buildroot)
}

/// Print staged files, shown relative to the staging root.
pub fn print_installed(ctx: &PackageContext, installed: &[PathBuf]) {
    for path in installed {
        eprintln!("   Installed {}", display_staged(&ctx.pipeline.buildroot, path));
    }
}

fn display_staged(buildroot: &Path, path: &Path) -> String {
    match path.strip_prefix(buildroot) {
        Ok(rel) => format!("/{}", rel.display()),
        Err(_) => path.display().to_string(),
    }
}

/// File list from the command line, or one path per stdin line.
pub fn file_list(files: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files);
    }

    let input = std::io::read_to_string(std::io::stdin()).context("failed to read file list")?;
    Ok(input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}
