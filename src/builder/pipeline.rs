//! The build pipeline driver.
//!
//! Stages run strictly in order (build, install-runtime, install-devel).
//! The first failure stops the run; files already copied stay in place.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::builder::context::{InstallerMode, PipelineConfig};
use crate::builder::stage::{self, Artifact, Destination, Route, Stage, StageKind};
use crate::builder::toolchain::{installer_build, installer_install, InstallType, SwiftToolchain};
use crate::core::errors::{Error, Result};
use crate::core::link_name::LinkName;
use crate::core::module::{Classification, Module, ModuleKind};
use crate::util::fs;
use crate::util::process::CommandRunner;

/// A stage failed; carries the stage and the underlying error.
#[derive(Debug, Error)]
#[error("{stage} stage failed")]
pub struct StageFailure {
    pub stage: StageKind,
    #[source]
    pub source: Error,
}

/// What a pipeline run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Stages that finished successfully, in order
    pub completed: Vec<StageKind>,

    /// External commands that were run
    pub commands: Vec<String>,

    /// Files written below the staging root
    pub installed: Vec<PathBuf>,
}

/// Drives the stages for one package.
pub struct Pipeline<'a> {
    cfg: &'a PipelineConfig,
    runner: &'a dyn CommandRunner,
    classification: &'a Classification,
    link_name: Option<&'a LinkName>,
    embed: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        cfg: &'a PipelineConfig,
        runner: &'a dyn CommandRunner,
        classification: &'a Classification,
    ) -> Self {
        Pipeline {
            cfg,
            runner,
            classification,
            link_name: None,
            embed: false,
        }
    }

    /// Link name passed to the linked build. Required by the build stage.
    pub fn link_name(mut self, link_name: &'a LinkName) -> Self {
        self.link_name = Some(link_name);
        self
    }

    /// Build in embed mode (plain build before the linked build).
    pub fn embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }

    /// Run every stage.
    pub fn run_all(&self) -> std::result::Result<PipelineReport, StageFailure> {
        self.run(&StageKind::ALL)
    }

    /// Run the requested stages in canonical order, stopping at the first
    /// failure.
    pub fn run(&self, requested: &[StageKind]) -> std::result::Result<PipelineReport, StageFailure> {
        let mut report = PipelineReport::default();

        for stage in stage::plan(requested) {
            tracing::info!("{} stage starting", stage.kind);
            self.run_stage(&stage, &mut report)
                .map_err(|source| StageFailure {
                    stage: stage.kind,
                    source,
                })?;
            report.completed.push(stage.kind);
            tracing::info!("{} stage finished", stage.kind);
        }

        Ok(report)
    }

    fn run_stage(&self, stage: &Stage, report: &mut PipelineReport) -> Result<()> {
        if stage.requires_build {
            self.check_built(report)?;
        }

        match (&self.cfg.installer, stage.kind) {
            (InstallerMode::Copy, StageKind::Build) => self.build(report),
            (InstallerMode::Copy, _) => {
                for route in stage.routes {
                    self.install_route(route, report)?;
                }
                Ok(())
            }
            (InstallerMode::Unified { program }, kind) => {
                let cmd = match kind {
                    StageKind::Build => installer_build(program, self.cfg),
                    StageKind::InstallRuntime => {
                        installer_install(program, self.cfg, InstallType::Runtime)
                    }
                    StageKind::InstallDevel => {
                        installer_install(program, self.cfg, InstallType::Devel)
                    }
                };
                report.commands.push(cmd.display_command());
                self.runner.run_checked(&cmd)?;
                Ok(())
            }
        }
    }

    /// Install stages need a build from this run, or build output on disk
    /// from an earlier one.
    fn check_built(&self, report: &PipelineReport) -> Result<()> {
        if report.completed.contains(&StageKind::Build) || self.cfg.build_dir.is_dir() {
            return Ok(());
        }
        Err(Error::not_found(
            &self.cfg.build_dir,
            "build output missing; run the build stage first",
        ))
    }

    fn build(&self, report: &mut PipelineReport) -> Result<()> {
        let link_name = self.link_name.ok_or_else(|| Error::InvalidLinkName {
            name: String::new(),
        })?;
        let commands = SwiftToolchain::new(self.cfg).build_commands(link_name, self.embed);
        for cmd in commands {
            report.commands.push(cmd.display_command());
            self.runner.run_checked(&cmd)?;
        }
        Ok(())
    }

    fn modules_for(&self, route: &Route) -> Vec<Module> {
        self.classification
            .modules(&self.cfg.sources_dir)
            .into_iter()
            .filter(|module| route.kinds.contains(&module.kind))
            .collect()
    }

    fn destination(&self, destination: Destination, module: &str) -> PathBuf {
        match destination {
            Destination::BinDir => self.cfg.staged_bindir(),
            Destination::LibDir => self.cfg.staged_libdir(),
            Destination::ModuleDir => self.cfg.staged_moduledir(),
            Destination::ClangModuleDir => self.cfg.staged_clangmodule_dir(module),
        }
    }

    fn install_route(&self, route: &Route, report: &mut PipelineReport) -> Result<()> {
        let modules = self.modules_for(route);
        if modules.is_empty() {
            return Ok(());
        }

        if route.artifact.is_package_wide() {
            let dest = self.destination(route.destination, "");
            return self.install_shared_objects(&dest, report);
        }

        for module in modules {
            let dest = self.destination(route.destination, &module.name);
            tracing::debug!(
                "installing {:?} of `{}` into {}",
                route.artifact,
                module.name,
                dest.display()
            );

            match route.artifact {
                Artifact::Binary => {
                    let src = self.cfg.build_artifact(&module.name);
                    report.installed.push(fs::copy_into(&src, &dest)?);
                }
                Artifact::ModuleInterface => {
                    for ext in ["swiftmodule", "swiftdoc"] {
                        let src = self.cfg.build_artifact(format!("{}.{}", module.name, ext));
                        report.installed.push(fs::copy_into(&src, &dest)?);
                    }
                }
                Artifact::Headers => {
                    report
                        .installed
                        .extend(fs::copy_tree(&module.include_dir(), &dest)?);
                }
                Artifact::SharedObjects => {}
            }
        }

        Ok(())
    }

    fn install_shared_objects(&self, dest: &Path, report: &mut PipelineReport) -> Result<()> {
        let objects = fs::glob_files(&self.cfg.build_dir, "*.so")?;

        if objects.is_empty() {
            // Header-only clang modules legitimately produce nothing.
            if self.classification.of_kind(ModuleKind::Library).is_empty() {
                tracing::warn!(
                    "no shared objects in {}; only clang modules present",
                    self.cfg.build_dir.display()
                );
                return Ok(());
            }
            return Err(Error::not_found(
                self.cfg.build_dir.join("*.so"),
                "no shared objects were produced",
            ));
        }

        for object in objects {
            report.installed.push(fs::copy_into(&object, dest)?);
        }
        Ok(())
    }
}
