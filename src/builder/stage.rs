//! Pipeline stage descriptors and artifact routing tables.

use std::fmt;

use crate::core::module::ModuleKind;

/// The three pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    Build,
    InstallRuntime,
    InstallDevel,
}

impl StageKind {
    pub const ALL: [StageKind; 3] = [
        StageKind::Build,
        StageKind::InstallRuntime,
        StageKind::InstallDevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Build => "build",
            StageKind::InstallRuntime => "install-runtime",
            StageKind::InstallDevel => "install-devel",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "build" => Ok(StageKind::Build),
            "install-runtime" | "install" | "runtime" => Ok(StageKind::InstallRuntime),
            "install-devel" | "devel" => Ok(StageKind::InstallDevel),
            _ => Err(format!(
                "unknown stage `{}` (expected build, install-runtime or install-devel)",
                s
            )),
        }
    }
}

/// A build product to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Every `*.so` in the build output; package-wide, not per module.
    SharedObjects,
    /// `<build>/<module>`
    Binary,
    /// `<build>/<module>.swiftmodule` and `<build>/<module>.swiftdoc`
    ModuleInterface,
    /// Everything below `<sources>/<module>/include`
    Headers,
}

impl Artifact {
    /// Whether the artifact is collected once for the whole package.
    pub fn is_package_wide(&self) -> bool {
        matches!(self, Artifact::SharedObjects)
    }
}

/// Where an artifact lands, below the staging root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    BinDir,
    LibDir,
    ModuleDir,
    /// `<clangmoduleroot>/<module>/`
    ClangModuleDir,
}

/// One line of a routing table: modules of these kinds install this
/// artifact into this destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub kinds: &'static [ModuleKind],
    pub artifact: Artifact,
    pub destination: Destination,
}

/// Routing table for runtime artifacts.
pub const RUNTIME_ROUTES: &[Route] = &[
    Route {
        kinds: &[ModuleKind::Library, ModuleKind::ClangLibrary],
        artifact: Artifact::SharedObjects,
        destination: Destination::LibDir,
    },
    Route {
        kinds: &[ModuleKind::Executable],
        artifact: Artifact::Binary,
        destination: Destination::BinDir,
    },
];

/// Routing table for development artifacts.
pub const DEVEL_ROUTES: &[Route] = &[
    Route {
        kinds: &[ModuleKind::Library],
        artifact: Artifact::ModuleInterface,
        destination: Destination::ModuleDir,
    },
    Route {
        kinds: &[ModuleKind::ClangLibrary],
        artifact: Artifact::Headers,
        destination: Destination::ClangModuleDir,
    },
];

/// Static description of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub kind: StageKind,
    /// Needs a successful build, in this run or a previous one.
    pub requires_build: bool,
    /// Artifact routing; empty for the build stage.
    pub routes: &'static [Route],
}

/// The stages in canonical order.
pub const STAGES: [Stage; 3] = [
    Stage {
        kind: StageKind::Build,
        requires_build: false,
        routes: &[],
    },
    Stage {
        kind: StageKind::InstallRuntime,
        requires_build: true,
        routes: RUNTIME_ROUTES,
    },
    Stage {
        kind: StageKind::InstallDevel,
        requires_build: true,
        routes: DEVEL_ROUTES,
    },
];

/// Descriptors for the requested stages, deduplicated, in canonical order.
pub fn plan(requested: &[StageKind]) -> Vec<Stage> {
    STAGES
        .iter()
        .filter(|stage| requested.contains(&stage.kind))
        .copied()
        .collect()
}
