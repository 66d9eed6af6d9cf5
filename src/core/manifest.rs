//! Package manifest patching for embed mode.
//!
//! The manifest is never parsed. Embed mode appends three statements to
//! `Package.swift`:
//!
//! ```text
//! let embed: Set<String> = ["https://example.com/dep.git"]
//! package.dependencies = package.dependencies.filter { embed.contains($0.url) }
//! products.append(Product(name: "mypackage", type: .Library(.Dynamic), modules: ["Util", "Net"]))
//! ```
//!
//! The filter keeps only declared dependencies whose URL is in the set, so
//! nothing is added back. The product exports every library module under
//! the link name.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::embed::{EmbedRequest, EmbedSet};
use crate::core::errors::Result;
use crate::core::link_name::LinkName;
use crate::util::fs;

/// The manifest file name inside a package directory.
pub const MANIFEST_NAME: &str = "Package.swift";

static PACKAGE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.package\s*\(\s*url\s*:\s*"([^"]+)""#).expect("valid regex")
});

/// Quote a value as a Swift string literal.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

fn quoted_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values.into_iter().map(quote).collect::<Vec<_>>().join(", ")
}

/// The statements appended in embed mode, newline terminated.
pub fn embed_statements(embed: &EmbedSet, link_name: &LinkName, libraries: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "let embed: Set<String> = [{}]\n",
        quoted_list(embed.iter())
    ));
    out.push_str(
        "package.dependencies = package.dependencies.filter { embed.contains($0.url) }\n",
    );
    out.push_str(&format!(
        "products.append(Product(name: {}, type: .Library(.Dynamic), modules: [{}]))\n",
        quote(link_name.as_str()),
        quoted_list(libraries.iter().map(String::as_str))
    ));
    out
}

/// Return `original` with the embed statements appended.
pub fn embed_transform(
    original: &str,
    embed: &EmbedSet,
    link_name: &LinkName,
    libraries: &[String],
) -> String {
    let mut out = String::with_capacity(original.len() + 256);
    out.push_str(original);
    if !original.is_empty() && !original.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&embed_statements(embed, link_name, libraries));
    out
}

/// Append the embed statements to the manifest at `path`.
///
/// An inactive request leaves the file untouched. Returns whether the file
/// was modified.
pub fn patch_manifest(
    path: &Path,
    request: &EmbedRequest,
    link_name: &LinkName,
    libraries: &[String],
) -> Result<bool> {
    let Some(embed) = request.set() else {
        tracing::debug!("embed mode inactive, leaving {} untouched", path.display());
        return Ok(false);
    };

    let original = fs::read_to_string(path)?;
    for url in dropped_dependencies(&original, embed) {
        tracing::info!("dropping dependency {} (not embedded)", url);
    }

    let mut addition = String::new();
    if !original.is_empty() && !original.ends_with('\n') {
        addition.push('\n');
    }
    addition.push_str(&embed_statements(embed, link_name, libraries));
    fs::append(path, &addition)?;

    tracing::info!(
        "patched {}: {} embedded dependency(ies), product `{}` with {} module(s)",
        path.display(),
        embed.len(),
        link_name,
        libraries.len()
    );
    Ok(true)
}

/// Whether the embed statements were already appended to this manifest.
pub fn is_patched(manifest: &str) -> bool {
    manifest
        .lines()
        .any(|line| line.trim_start().starts_with("let embed: Set<String> ="))
}

/// Dependency URLs declared with `.package(url: "...")`, in order.
pub fn declared_dependency_urls(manifest: &str) -> Vec<String> {
    PACKAGE_URL_RE
        .captures_iter(manifest)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// What the appended filter statement does to a declared dependency list.
pub fn filter_dependencies(declared: &[String], embed: &EmbedSet) -> Vec<String> {
    declared
        .iter()
        .filter(|url| embed.contains(url))
        .cloned()
        .collect()
}

/// Declared dependencies the appended filter removes, in declared order.
pub fn dropped_dependencies(manifest: &str, embed: &EmbedSet) -> Vec<String> {
    let declared = declared_dependency_urls(manifest);
    let kept = filter_dependencies(&declared, embed);
    declared
        .into_iter()
        .filter(|url| !kept.contains(url))
        .collect()
}
