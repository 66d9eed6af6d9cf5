//! Implementation of `swiftpack build`, `install`, `patch` and friends.
//!
//! These wire the pieces together: load config, classify modules, resolve
//! the link name, patch the manifest for embed mode, then drive the stages.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::context::PipelineConfig;
use crate::builder::pipeline::{Pipeline, PipelineReport};
use crate::builder::stage::StageKind;
use crate::core::embed::EmbedRequest;
use crate::core::link_name::{LinkName, LinkNameSource};
use crate::core::manifest;
use crate::core::module::Classification;
use crate::util::config::Config;
use crate::util::fs;
use crate::util::process::{find_swift, CommandRunner};

/// A package directory plus the configuration that applies to it.
#[derive(Debug, Clone)]
pub struct PackageContext {
    pub config: Config,
    pub pipeline: PipelineConfig,
}

impl PackageContext {
    /// Resolve the configuration for `package_dir`, staging into `buildroot`.
    pub fn new(config: Config, package_dir: &Path, buildroot: &Path) -> Result<Self> {
        let mut pipeline = config.pipeline_config(package_dir, buildroot)?;
        pipeline.swift = find_swift(&pipeline.swift);
        Ok(PackageContext { config, pipeline })
    }

    /// Classify the package's modules.
    pub fn classify(&self, runner: &dyn CommandRunner) -> Result<Classification> {
        self.config
            .module_source()
            .discover(&self.pipeline.sources_dir, runner)
            .with_context(|| {
                format!(
                    "failed to classify modules in {}",
                    self.pipeline.sources_dir.display()
                )
            })
    }

    /// Resolve the link name from an explicit package name, or by asking
    /// the manifest when none is given (or the config demands it).
    pub fn link_name(
        &self,
        package_name: Option<&str>,
        runner: &dyn CommandRunner,
    ) -> Result<LinkName> {
        let source = match package_name {
            Some(name) if !self.config.link_name_from_manifest() => {
                LinkNameSource::Declared(name.to_string())
            }
            _ => LinkNameSource::Manifest {
                program: self.pipeline.swift.clone(),
                package_dir: self.pipeline.package_dir.clone(),
            },
        };

        source
            .resolve(runner)
            .context("failed to determine the link name")
    }
}

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Stages to run (empty = all)
    pub stages: Vec<StageKind>,

    /// Dependencies to embed into the package library
    pub embed: EmbedRequest,

    /// Declared package name, used for the link name
    pub package_name: Option<String>,
}

/// Result of patching the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Embed mode inactive; manifest untouched
    Unchanged,
    /// Statements appended
    Patched,
    /// Statements were already present from an earlier run
    AlreadyPatched,
}

/// Append the embed statements to the package manifest.
pub fn patch(
    ctx: &PackageContext,
    embed: &EmbedRequest,
    link_name: &LinkName,
    classification: &Classification,
) -> Result<PatchOutcome> {
    let path = ctx.pipeline.manifest_path();
    if !embed.is_active() {
        return Ok(PatchOutcome::Unchanged);
    }

    let text = fs::read_to_string(&path)?;
    if manifest::is_patched(&text) {
        tracing::warn!(
            "{} already carries embed statements, not patching again",
            path.display()
        );
        return Ok(PatchOutcome::AlreadyPatched);
    }

    manifest::patch_manifest(&path, embed, link_name, &classification.libraries)
        .with_context(|| format!("failed to patch {}", path.display()))?;
    Ok(PatchOutcome::Patched)
}

/// Build result.
#[derive(Debug)]
pub struct BuildResult {
    pub classification: Classification,
    /// Resolved only when the build stage runs
    pub link_name: Option<LinkName>,
    pub patch: PatchOutcome,
    pub report: PipelineReport,
}

/// Classify, patch (when building in embed mode) and run the stages.
pub fn build(
    ctx: &PackageContext,
    opts: &BuildOptions,
    runner: &dyn CommandRunner,
) -> Result<BuildResult> {
    let stages = if opts.stages.is_empty() {
        StageKind::ALL.to_vec()
    } else {
        opts.stages.clone()
    };

    let classification = ctx.classify(runner)?;

    // Install stages never look at the link name.
    let link_name = if stages.contains(&StageKind::Build) {
        Some(ctx.link_name(opts.package_name.as_deref(), runner)?)
    } else {
        None
    };

    let patch_outcome = match link_name {
        Some(ref link) => patch(ctx, &opts.embed, link, &classification)?,
        None => PatchOutcome::Unchanged,
    };

    let mut pipeline = Pipeline::new(&ctx.pipeline, runner, &classification)
        .embed(opts.embed.is_active());
    if let Some(ref link) = link_name {
        pipeline = pipeline.link_name(link);
    }
    let report = pipeline.run(&stages)?;

    Ok(BuildResult {
        classification,
        link_name,
        patch: patch_outcome,
        report,
    })
}

/// Staged files relative to the staging root, for file lists.
pub fn staged_paths(ctx: &PackageContext, report: &PipelineReport) -> Vec<PathBuf> {
    report
        .installed
        .iter()
        .map(|p| {
            p.strip_prefix(&ctx.pipeline.buildroot)
                .map(|rel| Path::new("/").join(rel))
                .unwrap_or_else(|_| p.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::pipeline::StageFailure;
    use crate::core::errors::Error;
    use crate::test_support::{PackageFixture, RecordingRunner};
    use crate::util::process::ProcessOutput;
    use tempfile::TempDir;

    fn context(pkg: &PackageFixture, stage_root: &Path) -> PackageContext {
        let mut ctx = PackageContext::new(Config::default(), pkg.root(), stage_root).unwrap();
        // Keep command lines stable regardless of the host's PATH.
        ctx.pipeline.swift = PathBuf::from("swift");
        ctx
    }

    #[test]
    fn test_end_to_end_layout() {
        let pkg = PackageFixture::new("my-package")
            .executable("App")
            .clang_library("Core", &["core.h"])
            .library("Util")
            .built(&["App", "libCore.so", "libUtil.so", "Util.swiftmodule", "Util.swiftdoc"])
            .create();
        let stage_root = TempDir::new().unwrap();
        let ctx = context(&pkg, stage_root.path());
        let runner = RecordingRunner::new();

        let opts = BuildOptions {
            package_name: Some("my-package".to_string()),
            ..Default::default()
        };
        let result = build(&ctx, &opts, &runner).unwrap();

        assert_eq!(result.classification.executables, vec!["App"]);
        assert_eq!(result.classification.clang_libraries, vec!["Core"]);
        assert_eq!(result.classification.libraries, vec!["Util"]);
        assert_eq!(result.patch, PatchOutcome::Unchanged);

        let staged = staged_paths(&ctx, &result.report);
        for expected in [
            "/usr/bin/App",
            "/usr/lib/swift/linux/libCore.so",
            "/usr/lib/swift/linux/libUtil.so",
            "/usr/lib/swift/linux/x86_64/Util.swiftmodule",
            "/usr/lib/swift/linux/x86_64/Util.swiftdoc",
            "/usr/lib/swift/Core/core.h",
        ] {
            assert!(
                staged.contains(&PathBuf::from(expected)),
                "missing {expected} in {staged:?}"
            );
        }

        let original = std::fs::read_to_string(pkg.manifest_path()).unwrap();
        assert_eq!(original, pkg.manifest());
    }

    #[test]
    fn test_embed_build_patches_manifest_once() {
        let pkg = PackageFixture::new("my-package")
            .library("Util")
            .library("Net")
            .dependency("https://example.com/dep.git")
            .dependency("https://example.com/other.git")
            .built(&["libmypackage.so", "Util.swiftmodule", "Util.swiftdoc", "Net.swiftmodule", "Net.swiftdoc"])
            .create();
        let stage_root = TempDir::new().unwrap();
        let ctx = context(&pkg, stage_root.path());
        let runner = RecordingRunner::new();

        let opts = BuildOptions {
            stages: vec![StageKind::Build],
            embed: EmbedRequest::from_urls(["https://example.com/dep.git"]),
            package_name: Some("my-package".to_string()),
        };

        let first = build(&ctx, &opts, &runner).unwrap();
        assert_eq!(first.patch, PatchOutcome::Patched);
        assert_eq!(first.report.commands.len(), 2);

        let manifest_text = std::fs::read_to_string(pkg.manifest_path()).unwrap();
        assert!(manifest_text.contains(r#"let embed: Set<String> = ["https://example.com/dep.git"]"#));
        assert!(manifest_text.contains(r#"modules: ["Net", "Util"]"#));
        assert!(!manifest_text
            .lines()
            .skip_while(|l| !l.starts_with("let embed"))
            .any(|l| l.contains("other.git")));

        let second = build(&ctx, &opts, &runner).unwrap();
        assert_eq!(second.patch, PatchOutcome::AlreadyPatched);
        assert_eq!(std::fs::read_to_string(pkg.manifest_path()).unwrap(), manifest_text);
    }

    #[test]
    fn test_link_name_from_manifest_when_no_name_given() {
        let pkg = PackageFixture::new("swift-log").library("Logging").create();
        let stage_root = TempDir::new().unwrap();
        let ctx = context(&pkg, stage_root.path());
        let runner = RecordingRunner::new()
            .respond("dump-package", ProcessOutput::ok(r#"{"name":"swift-log"}"#));

        let link = ctx.link_name(None, &runner).unwrap();

        assert_eq!(link.as_str(), "swiftlog");
        assert_eq!(runner.commands(), vec!["swift package dump-package"]);
    }

    #[test]
    fn test_build_failure_surfaces_stage() {
        let pkg = PackageFixture::new("pkg").library("Util").create();
        let stage_root = TempDir::new().unwrap();
        let ctx = context(&pkg, stage_root.path());
        let runner = RecordingRunner::new()
            .respond("swift build", ProcessOutput::failed(1, "error: compile failed"));

        let opts = BuildOptions {
            package_name: Some("pkg".to_string()),
            ..Default::default()
        };
        let err = build(&ctx, &opts, &runner).unwrap_err();

        let failure = err.downcast_ref::<StageFailure>().unwrap();
        assert_eq!(failure.stage, StageKind::Build);
        assert!(failure.source.is_build_error());
        let rendered = format!("{:#}", err);
        assert!(rendered.contains("build stage failed"));
        assert!(rendered.contains("error: compile failed"));
    }

    #[test]
    fn test_install_only_skips_link_name() {
        let pkg = PackageFixture::new("pkg")
            .executable("App")
            .built(&["App"])
            .create();
        let stage_root = TempDir::new().unwrap();
        let ctx = context(&pkg, stage_root.path());
        let runner = RecordingRunner::new();

        let opts = BuildOptions {
            stages: vec![StageKind::InstallRuntime],
            ..Default::default()
        };
        let result = build(&ctx, &opts, &runner).unwrap();

        assert!(result.link_name.is_none());
        assert!(runner.commands().is_empty());
        assert_eq!(
            staged_paths(&ctx, &result.report),
            vec![PathBuf::from("/usr/bin/App")]
        );
    }

    #[test]
    fn test_missing_sources_dir_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let stage_root = TempDir::new().unwrap();
        let ctx = PackageContext::new(Config::default(), tmp.path(), stage_root.path()).unwrap();

        let err = ctx.classify(&RecordingRunner::new()).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Io { .. })));
    }
}
