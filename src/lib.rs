//! swiftpack - packaging helper for Swift packages on Linux
//!
//! This crate provides the library behind the `swiftpack` command:
//! module classification, manifest patching for embedded dependencies,
//! link-name resolution and the build/install pipeline.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for swiftpack unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording command runner and on-disk
/// package fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    classify::Classifier, embed::EmbedRequest, errors::Error, link_name::LinkName,
    module::Classification, module::ModuleKind, package_url::PackageUrl,
};

pub use crate::builder::{Pipeline, StageKind};
pub use crate::util::config::Config;
