//! High-level operations.
//!
//! This module contains the implementation of swiftpack commands.

pub mod generators;
pub mod swiftpack_build;

pub use generators::{provides_command, requires_command, run_generator};
pub use swiftpack_build::{
    build, patch, staged_paths, BuildOptions, BuildResult, PackageContext, PatchOutcome,
};
