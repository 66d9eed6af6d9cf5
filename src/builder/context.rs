//! Pipeline configuration: install destinations, toolchain and layout.

use std::path::{Path, PathBuf};

use crate::core::classify::DEFAULT_ENTRY_POINT;
use crate::util::fs::under_root;

/// Default binary install directory.
pub const DEFAULT_BINDIR: &str = "/usr/bin";
/// Default shared library install directory.
pub const DEFAULT_LIBDIR: &str = "/usr/lib/swift/linux";
/// Default `.swiftmodule`/`.swiftdoc` install directory.
pub const DEFAULT_MODULEDIR: &str = "/usr/lib/swift/linux/x86_64";
/// Default root for clang module headers.
pub const DEFAULT_CLANGMODULEROOT: &str = "/usr/lib/swift";
/// Default module root inside the package.
pub const DEFAULT_SOURCES_DIR: &str = "Sources";
/// Default release build output directory inside the package.
pub const DEFAULT_BUILD_DIR: &str = ".build/release";
/// Default build tool.
pub const DEFAULT_SWIFT: &str = "swift";

/// Default flags for the release build.
pub fn default_build_flags() -> Vec<String> {
    ["-c", "release", "-Xcc", "-D_GNU_SOURCE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Absolute install destinations, before the staging root is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDirs {
    pub bindir: PathBuf,
    pub libdir: PathBuf,
    pub moduledir: PathBuf,
    pub clangmoduleroot: PathBuf,
}

impl Default for InstallDirs {
    fn default() -> Self {
        InstallDirs {
            bindir: PathBuf::from(DEFAULT_BINDIR),
            libdir: PathBuf::from(DEFAULT_LIBDIR),
            moduledir: PathBuf::from(DEFAULT_MODULEDIR),
            clangmoduleroot: PathBuf::from(DEFAULT_CLANGMODULEROOT),
        }
    }
}

/// How build and install stages talk to the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InstallerMode {
    /// Run `swift build` and copy artifacts in-process.
    #[default]
    Copy,
    /// Hand every stage to a unified package installer tool.
    Unified { program: PathBuf },
}

/// Everything the pipeline driver needs for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Package directory containing `Package.swift`
    pub package_dir: PathBuf,

    /// Module root, usually `<package>/Sources`
    pub sources_dir: PathBuf,

    /// Release build output, usually `<package>/.build/release`
    pub build_dir: PathBuf,

    /// Staging root prefixed to every install destination
    pub buildroot: PathBuf,

    /// Install destinations
    pub install_dirs: InstallDirs,

    /// Build tool
    pub swift: PathBuf,

    /// Flags passed to every build invocation
    pub build_flags: Vec<String>,

    /// Entry-point file marking an executable module
    pub entry_point: String,

    /// Build/install invocation surface
    pub installer: InstallerMode,
}

impl PipelineConfig {
    /// A configuration with default layout and destinations.
    pub fn new(package_dir: impl Into<PathBuf>, buildroot: impl Into<PathBuf>) -> Self {
        let package_dir = package_dir.into();
        PipelineConfig {
            sources_dir: package_dir.join(DEFAULT_SOURCES_DIR),
            build_dir: package_dir.join(DEFAULT_BUILD_DIR),
            package_dir,
            buildroot: buildroot.into(),
            install_dirs: InstallDirs::default(),
            swift: PathBuf::from(DEFAULT_SWIFT),
            build_flags: default_build_flags(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            installer: InstallerMode::Copy,
        }
    }

    /// Staged binary directory.
    pub fn staged_bindir(&self) -> PathBuf {
        under_root(&self.buildroot, &self.install_dirs.bindir)
    }

    /// Staged shared library directory.
    pub fn staged_libdir(&self) -> PathBuf {
        under_root(&self.buildroot, &self.install_dirs.libdir)
    }

    /// Staged module interface directory.
    pub fn staged_moduledir(&self) -> PathBuf {
        under_root(&self.buildroot, &self.install_dirs.moduledir)
    }

    /// Staged header directory for one clang module.
    pub fn staged_clangmodule_dir(&self, module: &str) -> PathBuf {
        under_root(&self.buildroot, &self.install_dirs.clangmoduleroot).join(module)
    }

    /// The manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.package_dir.join(crate::core::manifest::MANIFEST_NAME)
    }

    /// Path of a build product inside the build output directory.
    pub fn build_artifact(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.build_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_package_dir() {
        let cfg = PipelineConfig::new("/src/pkg", "/tmp/root");

        assert_eq!(cfg.sources_dir, PathBuf::from("/src/pkg/Sources"));
        assert_eq!(cfg.build_dir, PathBuf::from("/src/pkg/.build/release"));
        assert_eq!(cfg.manifest_path(), PathBuf::from("/src/pkg/Package.swift"));
        assert_eq!(cfg.build_flags, ["-c", "release", "-Xcc", "-D_GNU_SOURCE"]);
    }

    #[test]
    fn test_staged_destinations() {
        let cfg = PipelineConfig::new("/src/pkg", "/tmp/root");

        assert_eq!(cfg.staged_bindir(), PathBuf::from("/tmp/root/usr/bin"));
        assert_eq!(
            cfg.staged_libdir(),
            PathBuf::from("/tmp/root/usr/lib/swift/linux")
        );
        assert_eq!(
            cfg.staged_moduledir(),
            PathBuf::from("/tmp/root/usr/lib/swift/linux/x86_64")
        );
        assert_eq!(
            cfg.staged_clangmodule_dir("Core"),
            PathBuf::from("/tmp/root/usr/lib/swift/Core")
        );
    }
}
