//! swiftpack CLI - packaging helper for Swift packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("swiftpack=debug")
    } else {
        EnvFilter::new("swiftpack=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    let global = &cli.global;
    match cli.command {
        Commands::Classify(args) => commands::classify::execute(global, args),
        Commands::LinkName(args) => commands::link_name::execute(global, args),
        Commands::PackageUrl(args) => commands::package_url::execute(args),
        Commands::Patch(args) => commands::patch::execute(global, args),
        Commands::Build(args) => commands::build::execute(global, args),
        Commands::Install => commands::install::execute_runtime(global),
        Commands::InstallDevel => commands::install::execute_devel(global),
        Commands::Run(args) => commands::run::execute(global, args),
        Commands::Provides(args) => commands::generate::execute_provides(global, args),
        Commands::Requires(args) => commands::generate::execute_requires(global, args),
    }
}
