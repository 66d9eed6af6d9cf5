//! Link name derivation.
//!
//! The link name is the package name with every `-` removed. It names the
//! shared library's module namespace and the product appended in embed
//! mode. No other characters are touched.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::errors::{Error, Result};
use crate::util::process::{CommandRunner, ProcessBuilder};

/// The externally visible library name of a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkName(String);

impl LinkName {
    /// Derive a link name from a package name.
    pub fn from_package_name(name: &str) -> Result<Self> {
        let stripped: String = name.chars().filter(|c| *c != '-').collect();
        if stripped.is_empty() {
            return Err(Error::InvalidLinkName {
                name: name.to_string(),
            });
        }
        Ok(LinkName(stripped))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LinkName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where the package name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkNameSource {
    /// The name declared by the packager.
    Declared(String),
    /// The `name` field reported by `<program> package dump-package`.
    Manifest {
        program: PathBuf,
        package_dir: PathBuf,
    },
}

#[derive(Deserialize)]
struct DumpedPackage {
    name: String,
}

impl LinkNameSource {
    /// Resolve the link name, running the introspection tool if needed.
    pub fn resolve(&self, runner: &dyn CommandRunner) -> Result<LinkName> {
        let name = match self {
            LinkNameSource::Declared(name) => name.clone(),
            LinkNameSource::Manifest {
                program,
                package_dir,
            } => query_package_name(program, package_dir, runner)?,
        };

        let link_name = LinkName::from_package_name(&name)?;
        tracing::debug!("link name for `{}` is `{}`", name, link_name);
        Ok(link_name)
    }
}

fn query_package_name(
    program: &Path,
    package_dir: &Path,
    runner: &dyn CommandRunner,
) -> Result<String> {
    let cmd = ProcessBuilder::new(program)
        .args(["package", "dump-package"])
        .cwd(package_dir);
    let output = runner.run_checked(&cmd)?;

    let dumped: DumpedPackage =
        serde_json::from_slice(&output.stdout).map_err(|e| Error::Introspection {
            message: format!("`{}` printed invalid JSON: {}", cmd.display_command(), e),
        })?;

    Ok(dumped.name)
}
