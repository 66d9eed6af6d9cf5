//! Core data structures for swiftpack.
//!
//! This module contains the types the pipeline operates on:
//! - Module kinds and classification
//! - Link names and package URLs
//! - Embed requests and manifest patching

pub mod classify;
pub mod embed;
pub mod errors;
pub mod link_name;
pub mod manifest;
pub mod module;
pub mod package_url;

pub use classify::{Classifier, ExternalFinder, ModuleSource};
pub use embed::{EmbedRequest, EmbedSet};
pub use errors::{Error, Result};
pub use link_name::{LinkName, LinkNameSource};
pub use manifest::MANIFEST_NAME;
pub use module::{Classification, Module, ModuleKind};
pub use package_url::PackageUrl;
