//! Module classification.
//!
//! Each immediate subdirectory of the module root is matched against an
//! ordered rule list. The first rule whose marker is present decides the
//! kind; a directory matching no rule gets the default kind. With the
//! standard rules this means:
//!
//! 1. `main.swift` directly inside the directory => executable
//! 2. an `include/` directory directly inside it => clang library
//! 3. otherwise => library
//!
//! The classifier only reads the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{Error, Result};
use crate::core::module::{Classification, ModuleKind};
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Default entry-point file marking an executable module.
pub const DEFAULT_ENTRY_POINT: &str = "main.swift";

/// Directory marking a clang module.
pub const INCLUDE_DIR: &str = "include";

/// Something whose presence inside a module directory selects a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// A regular file with this name directly inside the directory.
    File(String),
    /// A subdirectory with this name directly inside the directory.
    Dir(String),
}

impl Marker {
    /// Check whether the marker is present in `dir`.
    pub fn is_present(&self, dir: &Path) -> bool {
        match self {
            Marker::File(name) => dir.join(name).is_file(),
            Marker::Dir(name) => dir.join(name).is_dir(),
        }
    }
}

/// One `(marker, kind)` pair of the rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub marker: Marker,
    pub kind: ModuleKind,
}

/// Ordered rule list with a mandatory fallback kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<Rule>,
    default: ModuleKind,
}

impl Classifier {
    /// The standard Swift package rules, using `entry_point` as the
    /// executable marker.
    pub fn new(entry_point: impl Into<String>) -> Self {
        Classifier {
            rules: vec![
                Rule {
                    marker: Marker::File(entry_point.into()),
                    kind: ModuleKind::Executable,
                },
                Rule {
                    marker: Marker::Dir(INCLUDE_DIR.to_string()),
                    kind: ModuleKind::ClangLibrary,
                },
            ],
            default: ModuleKind::Library,
        }
    }

    /// Decide the kind of a single module directory.
    pub fn kind_of(&self, dir: &Path) -> ModuleKind {
        self.rules
            .iter()
            .find(|rule| rule.marker.is_present(dir))
            .map(|rule| rule.kind)
            .unwrap_or(self.default)
    }

    /// Classify every immediate subdirectory of `root`.
    ///
    /// Hidden directories and plain files are skipped. Modules are visited
    /// in name order so the result is stable across filesystems.
    pub fn classify(&self, root: &Path) -> Result<Classification> {
        let mut result = Classification::new();

        for name in module_dirs(root)? {
            let kind = self.kind_of(&root.join(&name));
            tracing::debug!("module `{}` classified as {}", name, kind);
            result.push(name, kind);
        }

        Ok(result)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(DEFAULT_ENTRY_POINT)
    }
}

/// Names of the module directories directly below `root`, sorted.
fn module_dirs(root: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(root).map_err(|e| Error::io(root, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(
                "skipping {}: module name is not valid UTF-8",
                entry.path().display()
            );
            continue;
        };
        if name.starts_with('.') || !entry.path().is_dir() {
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}

/// Delegates module discovery to an external tool, one call per kind.
///
/// The tool is invoked as `<program> <args..> --kind <kind> --format
/// <template>` and must print the matching module names separated by
/// whitespace or commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFinder {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub format: String,
}

impl ExternalFinder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ExternalFinder {
            program: program.into(),
            args: Vec::new(),
            format: "%f ".to_string(),
        }
    }

    /// Extra leading arguments, e.g. a subcommand.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn command(&self, root: &Path, kind: ModuleKind) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(&self.args)
            .args(["--kind", kind.as_str(), "--format", self.format.as_str()])
            .cwd(root)
    }

    /// Ask the tool for each kind and merge the answers.
    pub fn find(&self, root: &Path, runner: &dyn CommandRunner) -> Result<Classification> {
        if !root.is_dir() {
            return Err(Error::not_found(root, "module root does not exist"));
        }

        let mut lists = Vec::with_capacity(ModuleKind::ALL.len());
        for kind in ModuleKind::ALL {
            let output = runner.run_checked(&self.command(root, kind))?;
            lists.push(split_names(&output.stdout_str()));
        }

        let [executables, libraries, clang_libraries]: [Vec<String>; 3] = lists
            .try_into()
            .map_err(|_| Error::Introspection {
                message: "module finder returned an unexpected number of lists".to_string(),
            })?;

        Classification::from_lists(executables, libraries, clang_libraries)
    }
}

fn split_names(output: &str) -> Vec<String> {
    output
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|s| s.trim_matches('"'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Where module classifications come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSource {
    /// Scan the module root in-process.
    Filesystem(Classifier),
    /// Ask an external tool.
    External(ExternalFinder),
}

impl ModuleSource {
    /// Classify the modules under `root`.
    pub fn discover(&self, root: &Path, runner: &dyn CommandRunner) -> Result<Classification> {
        let result = match self {
            ModuleSource::Filesystem(classifier) => classifier.classify(root)?,
            ModuleSource::External(finder) => finder.find(root, runner)?,
        };

        tracing::debug!(
            "found {} executable(s), {} library(ies), {} clang module(s)",
            result.executables.len(),
            result.libraries.len(),
            result.clang_libraries.len()
        );
        Ok(result)
    }
}

impl Default for ModuleSource {
    fn default() -> Self {
        ModuleSource::Filesystem(Classifier::default())
    }
}
