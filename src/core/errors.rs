//! Error types shared by the classifier, manifest patching and the pipeline.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::module::ModuleKind;

/// Result alias for core operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while classifying, patching, building or installing.
#[derive(Debug, Error)]
pub enum Error {
    /// A file or directory could not be read, written or copied.
    #[error("I/O error at `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external tool exited with a non-zero status.
    #[error("`{command}` failed with exit code {}{}", display_status(.status), display_stderr(.stderr))]
    Build {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// An external tool could not be started at all.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A module was reported under more than one kind.
    #[error("module `{module}` is classified as more than one kind: {}", display_kinds(.kinds))]
    ClassificationAmbiguity {
        module: String,
        kinds: Vec<ModuleKind>,
    },

    /// The package name produced an empty link name.
    #[error("package name `{name}` does not yield a usable link name")]
    InvalidLinkName { name: String },

    /// The manifest introspection tool returned something unusable.
    #[error("could not read package name from manifest: {message}")]
    Introspection { message: String },
}

impl Error {
    /// Wrap an `io::Error` with the path it concerns.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// A `NotFound` I/O error for a path that was expected to exist.
    pub fn not_found(path: impl AsRef<Path>, what: &str) -> Self {
        Error::io(path, io::Error::new(io::ErrorKind::NotFound, what.to_string()))
    }

    /// Whether this error came from an external tool's exit status.
    pub fn is_build_error(&self) -> bool {
        matches!(self, Error::Build { .. })
    }
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

fn display_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

fn display_kinds(kinds: &[ModuleKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_message_includes_status_and_stderr() {
        let err = Error::Build {
            command: "swift build -c release".to_string(),
            status: Some(1),
            stderr: "error: no such module 'Foo'\n".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("`swift build -c release` failed with exit code 1"));
        assert!(msg.ends_with("error: no such module 'Foo'"));
        assert!(err.is_build_error());
    }

    #[test]
    fn test_ambiguity_lists_kinds() {
        let err = Error::ClassificationAmbiguity {
            module: "Core".to_string(),
            kinds: vec![ModuleKind::Executable, ModuleKind::ClangLibrary],
        };

        assert_eq!(
            err.to_string(),
            "module `Core` is classified as more than one kind: executable, clang-library"
        );
    }
}
