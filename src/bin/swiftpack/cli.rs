//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use swiftpack::builder::StageKind;
use swiftpack::core::{EmbedRequest, ModuleKind};

/// swiftpack - build and stage Swift packages for distribution packaging
#[derive(Parser)]
#[command(name = "swiftpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Package directory (containing Package.swift)
    #[arg(long, global = true, default_value = ".")]
    pub package_dir: PathBuf,

    /// Extra config file, overriding the global one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Staging root prefixed to every install destination
    #[arg(long, global = true, env = "RPM_BUILD_ROOT")]
    pub buildroot: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the package's modules by kind
    Classify(ClassifyArgs),

    /// Print the link name for a package
    LinkName(LinkNameArgs),

    /// Print the package identity URL
    PackageUrl(PackageUrlArgs),

    /// Append embed statements to Package.swift
    Patch(PatchArgs),

    /// Build the package
    Build(BuildArgs),

    /// Stage runtime artifacts (binaries, shared objects)
    Install,

    /// Stage development artifacts (module interfaces, headers)
    InstallDevel,

    /// Run several stages in order
    Run(RunArgs),

    /// Run the provides generator over a file list
    Provides(ProvidesArgs),

    /// Run the requires generator over a file list
    Requires(RequiresArgs),
}

/// Embedded dependency selection.
#[derive(Args, Debug, Clone, Default)]
pub struct EmbedArgs {
    /// Embed this dependency URL into the package library (repeatable)
    #[arg(long = "embed", value_name = "URL")]
    pub embed: Vec<String>,

    /// Build in embed mode, dropping every declared dependency
    #[arg(long, conflicts_with = "embed")]
    pub embed_nothing: bool,
}

impl EmbedArgs {
    pub fn request(&self) -> EmbedRequest {
        if self.embed_nothing {
            EmbedRequest::nothing()
        } else if self.embed.is_empty() {
            EmbedRequest::Inactive
        } else {
            EmbedRequest::from_urls(self.embed.iter().cloned())
        }
    }
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// Only list modules of this kind, space separated
    #[arg(long)]
    pub kind: Option<ModuleKind>,

    /// Print the classification as JSON
    #[arg(long, conflicts_with = "kind")]
    pub json: bool,
}

#[derive(Args)]
pub struct LinkNameArgs {
    /// Package name (read from the manifest when omitted)
    pub name: Option<String>,
}

#[derive(Args)]
pub struct PackageUrlArgs {
    /// Project URL
    pub url: String,

    /// Rewrite to scp-like SSH form
    #[arg(long)]
    pub ssh: bool,
}

#[derive(Args)]
pub struct PatchArgs {
    #[command(flatten)]
    pub embed: EmbedArgs,

    /// Package name used for the link name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub embed: EmbedArgs,

    /// Package name used for the link name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Stages to run (defaults to all)
    #[arg(long = "stage", value_name = "STAGE")]
    pub stages: Vec<StageKind>,

    #[command(flatten)]
    pub embed: EmbedArgs,

    /// Package name used for the link name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ProvidesArgs {
    /// Project URL
    pub url: String,

    /// Package version
    pub version: String,

    /// Installed files (read from stdin when omitted)
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct RequiresArgs {
    /// Installed files (read from stdin when omitted)
    pub files: Vec<PathBuf>,
}
