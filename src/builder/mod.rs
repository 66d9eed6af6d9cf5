//! Swift package build and install driver.
//!
//! This module turns a classification into `swift build` invocations and
//! copies the results into the staging root.

pub mod context;
pub mod pipeline;
pub mod stage;
pub mod toolchain;

pub use context::{InstallDirs, InstallerMode, PipelineConfig};
pub use pipeline::{Pipeline, PipelineReport, StageFailure};
pub use stage::{Stage, StageKind};
pub use toolchain::{InstallType, SwiftToolchain};
