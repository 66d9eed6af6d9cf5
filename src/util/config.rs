//! Configuration file support for swiftpack.
//!
//! Two locations are read:
//! - Global: `<user config dir>/swiftpack/config.toml` - distribution defaults
//! - Project: `swiftpack.toml` next to `Package.swift` - per-package overrides
//!
//! Project config takes precedence over global config. Anything left unset
//! falls back to the standard Swift-on-Linux layout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::context::{InstallDirs, InstallerMode, PipelineConfig};
use crate::core::classify::{Classifier, ExternalFinder, ModuleSource};

/// Name of the per-package config file.
pub const PROJECT_CONFIG_NAME: &str = "swiftpack.toml";

/// Default directory holding the provides/requires generators.
pub const DEFAULT_RPMCONFIGDIR: &str = "/usr/lib/rpm";

/// swiftpack configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Install destinations and package layout
    pub paths: PathsConfig,

    /// Build tool settings
    pub toolchain: ToolchainConfig,

    /// Build/install invocation surface
    pub installer: InstallerConfig,

    /// Metadata generator settings
    pub generators: GeneratorConfig,
}

/// Install destinations and package layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub bindir: Option<PathBuf>,
    pub libdir: Option<PathBuf>,
    pub moduledir: Option<PathBuf>,
    pub clangmoduleroot: Option<PathBuf>,

    /// Module root, relative to the package directory
    pub sources: Option<PathBuf>,

    /// Release build output, relative to the package directory
    pub build_dir: Option<PathBuf>,
}

/// Build tool settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Path or name of the `swift` executable
    pub swift: Option<PathBuf>,

    /// Flags for every build invocation (replaces the defaults when set)
    pub build_flags: Vec<String>,

    /// Entry-point file marking executable modules
    pub entry_point: Option<String>,

    /// External tool that lists modules by kind instead of scanning
    pub module_finder: Option<PathBuf>,

    /// Leading arguments for the module finder
    pub module_finder_args: Vec<String>,

    /// Take the link name from `swift package dump-package`
    pub link_name_from_manifest: Option<bool>,
}

/// Build/install invocation surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// `copy` (default) or `unified`
    pub mode: Option<String>,

    /// Unified installer executable
    pub program: Option<PathBuf>,
}

/// Metadata generator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory containing `swift.prov` and `swift.req`
    pub rpmconfigdir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let Config {
            paths,
            toolchain,
            installer,
            generators,
        } = other;

        merge_opt(&mut self.paths.bindir, paths.bindir);
        merge_opt(&mut self.paths.libdir, paths.libdir);
        merge_opt(&mut self.paths.moduledir, paths.moduledir);
        merge_opt(&mut self.paths.clangmoduleroot, paths.clangmoduleroot);
        merge_opt(&mut self.paths.sources, paths.sources);
        merge_opt(&mut self.paths.build_dir, paths.build_dir);

        merge_opt(&mut self.toolchain.swift, toolchain.swift);
        if !toolchain.build_flags.is_empty() {
            self.toolchain.build_flags = toolchain.build_flags;
        }
        merge_opt(&mut self.toolchain.entry_point, toolchain.entry_point);
        merge_opt(&mut self.toolchain.module_finder, toolchain.module_finder);
        if !toolchain.module_finder_args.is_empty() {
            self.toolchain.module_finder_args = toolchain.module_finder_args;
        }
        merge_opt(
            &mut self.toolchain.link_name_from_manifest,
            toolchain.link_name_from_manifest,
        );

        merge_opt(&mut self.installer.mode, installer.mode);
        merge_opt(&mut self.installer.program, installer.program);

        merge_opt(&mut self.generators.rpmconfigdir, generators.rpmconfigdir);
    }

    /// Parse the installer mode.
    pub fn installer_mode(&self) -> Result<InstallerMode> {
        match self.installer.mode.as_deref() {
            None | Some("copy") => Ok(InstallerMode::Copy),
            Some("unified") => {
                let program = self
                    .installer
                    .program
                    .clone()
                    .context("installer mode `unified` requires `installer.program`")?;
                Ok(InstallerMode::Unified { program })
            }
            Some(other) => bail!(
                "unknown installer mode `{}` (expected `copy` or `unified`)",
                other
            ),
        }
    }

    /// The module discovery strategy.
    pub fn module_source(&self) -> ModuleSource {
        match &self.toolchain.module_finder {
            Some(program) => ModuleSource::External(
                ExternalFinder::new(program.clone())
                    .with_args(self.toolchain.module_finder_args.clone()),
            ),
            None => ModuleSource::Filesystem(Classifier::new(self.entry_point())),
        }
    }

    /// Whether the link name always comes from the manifest.
    pub fn link_name_from_manifest(&self) -> bool {
        self.toolchain.link_name_from_manifest.unwrap_or(false)
    }

    /// Entry-point file name for executables.
    pub fn entry_point(&self) -> String {
        self.toolchain
            .entry_point
            .clone()
            .unwrap_or_else(|| crate::core::classify::DEFAULT_ENTRY_POINT.to_string())
    }

    /// Directory holding the metadata generators.
    pub fn rpmconfigdir(&self) -> PathBuf {
        self.generators
            .rpmconfigdir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RPMCONFIGDIR))
    }

    /// Resolve into a pipeline configuration for one package.
    pub fn pipeline_config(&self, package_dir: &Path, buildroot: &Path) -> Result<PipelineConfig> {
        let mut cfg = PipelineConfig::new(package_dir, buildroot);
        let defaults = InstallDirs::default();

        cfg.install_dirs = InstallDirs {
            bindir: self.paths.bindir.clone().unwrap_or(defaults.bindir),
            libdir: self.paths.libdir.clone().unwrap_or(defaults.libdir),
            moduledir: self.paths.moduledir.clone().unwrap_or(defaults.moduledir),
            clangmoduleroot: self
                .paths
                .clangmoduleroot
                .clone()
                .unwrap_or(defaults.clangmoduleroot),
        };
        if let Some(ref sources) = self.paths.sources {
            cfg.sources_dir = package_dir.join(sources);
        }
        if let Some(ref build_dir) = self.paths.build_dir {
            cfg.build_dir = package_dir.join(build_dir);
        }
        if let Some(ref swift) = self.toolchain.swift {
            cfg.swift = swift.clone();
        }
        if !self.toolchain.build_flags.is_empty() {
            cfg.build_flags = self.toolchain.build_flags.clone();
        }
        cfg.entry_point = self.entry_point();
        cfg.installer = self.installer_mode()?;

        Ok(cfg)
    }
}

fn merge_opt<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Get the global config path (`<config dir>/swiftpack/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "swiftpack")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Get the project config path.
pub fn project_config_path(package_dir: &Path) -> PathBuf {
    package_dir.join(PROJECT_CONFIG_NAME)
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (swiftpack.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
