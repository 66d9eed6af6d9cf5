//! Swift package fixtures written to temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

#[derive(Debug, Clone)]
enum FixtureModule {
    Executable,
    Library,
    ClangLibrary { headers: Vec<String> },
}

/// A Swift package laid out on disk.
///
/// Builder methods describe the package; `create` writes it into a fresh
/// temporary directory that lives as long as the fixture.
#[derive(Debug)]
pub struct PackageFixture {
    name: String,
    modules: Vec<(String, FixtureModule)>,
    dependencies: Vec<String>,
    built: Option<Vec<String>>,
    dir: Option<TempDir>,
}

impl PackageFixture {
    /// Create an empty package description.
    pub fn new(name: impl Into<String>) -> Self {
        PackageFixture {
            name: name.into(),
            modules: Vec::new(),
            dependencies: Vec::new(),
            built: None,
            dir: None,
        }
    }

    /// Add an executable module (`Sources/<name>/main.swift`).
    pub fn executable(mut self, name: &str) -> Self {
        self.modules
            .push((name.to_string(), FixtureModule::Executable));
        self
    }

    /// Add a Swift library module (`Sources/<name>/<name>.swift`).
    pub fn library(mut self, name: &str) -> Self {
        self.modules.push((name.to_string(), FixtureModule::Library));
        self
    }

    /// Add a clang module with the given headers below `include/`.
    pub fn clang_library(mut self, name: &str, headers: &[&str]) -> Self {
        self.modules.push((
            name.to_string(),
            FixtureModule::ClangLibrary {
                headers: headers.iter().map(|h| h.to_string()).collect(),
            },
        ));
        self
    }

    /// Declare a `.package(url:)` dependency in the manifest.
    pub fn dependency(mut self, url: &str) -> Self {
        self.dependencies.push(url.to_string());
        self
    }

    /// Pretend a release build happened, leaving these files in
    /// `.build/release`.
    pub fn built(mut self, files: &[&str]) -> Self {
        self.built = Some(files.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Write the package to a temporary directory.
    pub fn create(mut self) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        self.write_to(dir.path()).expect("write package fixture");
        self.dir = Some(dir);
        self
    }

    /// The package directory. Panics if `create` was not called.
    pub fn root(&self) -> &Path {
        self.dir.as_ref().expect("fixture not created").path()
    }

    /// The module root.
    pub fn sources(&self) -> PathBuf {
        self.root().join("Sources")
    }

    /// The manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("Package.swift")
    }

    /// Manifest text for this package.
    pub fn manifest(&self) -> String {
        let deps: Vec<String> = self
            .dependencies
            .iter()
            .map(|url| format!("        .package(url: \"{}\", from: \"1.0.0\"),\n", url))
            .collect();
        let targets: Vec<String> = self
            .modules
            .iter()
            .map(|(name, module)| match module {
                FixtureModule::Executable => {
                    format!("        .executableTarget(name: \"{}\"),\n", name)
                }
                _ => format!("        .target(name: \"{}\"),\n", name),
            })
            .collect();

        format!(
            "// swift-tools-version:5.5\n\
             import PackageDescription\n\
             \n\
             let package = Package(\n    \
             name: \"{}\",\n    \
             dependencies: [\n{}    ],\n    \
             targets: [\n{}    ]\n)\n",
            self.name,
            deps.concat(),
            targets.concat()
        )
    }

    fn write_to(&self, root: &Path) -> std::io::Result<()> {
        fs::write(root.join("Package.swift"), self.manifest())?;

        let sources = root.join("Sources");
        fs::create_dir_all(&sources)?;

        for (name, module) in &self.modules {
            let dir = sources.join(name);
            fs::create_dir_all(&dir)?;
            match module {
                FixtureModule::Executable => {
                    fs::write(dir.join("main.swift"), "print(\"hello\")\n")?;
                }
                FixtureModule::Library => {
                    fs::write(
                        dir.join(format!("{}.swift", name)),
                        format!("public struct {} {{}}\n", name),
                    )?;
                }
                FixtureModule::ClangLibrary { headers } => {
                    let include = dir.join("include");
                    fs::create_dir_all(&include)?;
                    for header in headers {
                        let path = include.join(header);
                        if let Some(parent) = path.parent() {
                            fs::create_dir_all(parent)?;
                        }
                        fs::write(path, format!("// {}\n", header))?;
                    }
                }
            }
        }

        if let Some(ref files) = self.built {
            let out = root.join(".build").join("release");
            fs::create_dir_all(&out)?;
            for file in files {
                fs::write(out.join(file), file.as_bytes())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let pkg = PackageFixture::new("demo")
            .executable("App")
            .clang_library("Core", &["core.h"])
            .dependency("https://example.com/dep.git")
            .built(&["App"])
            .create();

        assert!(pkg.sources().join("App/main.swift").is_file());
        assert!(pkg.sources().join("Core/include/core.h").is_file());
        assert!(pkg.root().join(".build/release/App").is_file());

        let manifest = fs::read_to_string(pkg.manifest_path()).unwrap();
        assert!(manifest.contains("name: \"demo\""));
        assert!(manifest.contains(".package(url: \"https://example.com/dep.git\""));
        assert!(manifest.contains(".executableTarget(name: \"App\")"));
    }
}
