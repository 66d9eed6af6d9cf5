//! Modules and their classification result.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::errors::{Error, Result};

/// The kind of a module, decided from its directory contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleKind {
    /// Has an entry-point source file; produces a binary.
    Executable,
    /// Plain Swift library; produces a shared object plus module interface.
    Library,
    /// C-family module exposing headers from an `include/` directory.
    ClangLibrary,
}

impl ModuleKind {
    /// All kinds, in the order their lists are reported.
    pub const ALL: [ModuleKind; 3] = [
        ModuleKind::Executable,
        ModuleKind::Library,
        ModuleKind::ClangLibrary,
    ];

    /// Get the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Executable => "executable",
            ModuleKind::Library => "library",
            ModuleKind::ClangLibrary => "clang-library",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "executable" | "exe" | "bin" => Ok(ModuleKind::Executable),
            "library" | "lib" | "swift" => Ok(ModuleKind::Library),
            "clang-library" | "clang" | "c" => Ok(ModuleKind::ClangLibrary),
            _ => Err(format!(
                "unknown module kind `{}` (expected executable, library or clang-library)",
                s
            )),
        }
    }
}

/// One immediate subdirectory of the module root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub kind: ModuleKind,
    pub path: PathBuf,
}

impl Module {
    pub fn new(root: &Path, name: impl Into<String>, kind: ModuleKind) -> Self {
        let name = name.into();
        Module {
            path: root.join(&name),
            name,
            kind,
        }
    }

    /// The module's `include/` directory.
    pub fn include_dir(&self) -> PathBuf {
        self.path.join("include")
    }
}

/// Module names partitioned by kind, each list in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub executables: Vec<String>,
    pub libraries: Vec<String>,
    pub clang_libraries: Vec<String>,
}

impl Classification {
    /// Create an empty classification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a module under its kind. Names already present are ignored.
    pub fn push(&mut self, name: impl Into<String>, kind: ModuleKind) {
        let name = name.into();
        if self.kind_of(&name).is_some() {
            return;
        }
        self.list_mut(kind).push(name);
    }

    /// Build a classification from three externally produced lists.
    ///
    /// Duplicates within one list collapse; a name under two kinds is a
    /// `ClassificationAmbiguity`.
    pub fn from_lists(
        executables: Vec<String>,
        libraries: Vec<String>,
        clang_libraries: Vec<String>,
    ) -> Result<Self> {
        let mut result = Classification::new();
        let lists = [
            (ModuleKind::Executable, executables),
            (ModuleKind::Library, libraries),
            (ModuleKind::ClangLibrary, clang_libraries),
        ];

        for (kind, names) in lists {
            for name in names {
                match result.kind_of(&name) {
                    Some(existing) if existing == kind => {}
                    Some(existing) => {
                        return Err(Error::ClassificationAmbiguity {
                            module: name,
                            kinds: vec![existing, kind],
                        });
                    }
                    None => result.list_mut(kind).push(name),
                }
            }
        }

        Ok(result)
    }

    /// Names of modules of the given kind.
    pub fn of_kind(&self, kind: ModuleKind) -> &[String] {
        match kind {
            ModuleKind::Executable => &self.executables,
            ModuleKind::Library => &self.libraries,
            ModuleKind::ClangLibrary => &self.clang_libraries,
        }
    }

    fn list_mut(&mut self, kind: ModuleKind) -> &mut Vec<String> {
        match kind {
            ModuleKind::Executable => &mut self.executables,
            ModuleKind::Library => &mut self.libraries,
            ModuleKind::ClangLibrary => &mut self.clang_libraries,
        }
    }

    /// The kind a module was assigned, if it is known.
    pub fn kind_of(&self, name: &str) -> Option<ModuleKind> {
        ModuleKind::ALL
            .into_iter()
            .find(|kind| self.of_kind(*kind).iter().any(|n| n == name))
    }

    /// Total number of modules.
    pub fn len(&self) -> usize {
        self.executables.len() + self.libraries.len() + self.clang_libraries.len()
    }

    /// Check if no modules were found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expand the names into modules rooted at `root`.
    pub fn modules(&self, root: &Path) -> Vec<Module> {
        ModuleKind::ALL
            .into_iter()
            .flat_map(|kind| {
                self.of_kind(kind)
                    .iter()
                    .map(move |name| Module::new(root, name.as_str(), kind))
            })
            .collect()
    }
}
