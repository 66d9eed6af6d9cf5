//! Test utilities for swiftpack unit tests.
//!
//! Provides a command runner that records invocations instead of spawning
//! processes, and fixtures that lay out Swift packages on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use swiftpack::test_support::{PackageFixture, RecordingRunner};
//!
//! #[test]
//! fn test_example() {
//!     let pkg = PackageFixture::new("demo").library("Util").create();
//!     let runner = RecordingRunner::new()
//!         .respond("swift build", ProcessOutput::failed(1, "error"));
//!
//!     // Run the pipeline against `pkg.root()` with `&runner`...
//! }
//! ```

pub mod fixtures;

use std::cell::RefCell;

use crate::core::errors::Result;
use crate::util::process::{CommandRunner, ProcessBuilder, ProcessOutput};

pub use fixtures::*;

/// Command runner that records every call and replays canned outputs.
///
/// Each call is matched against the registered patterns in order; the
/// first pattern contained in the rendered command line decides the
/// output. Unmatched commands succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: Vec<(String, ProcessOutput)>,
    calls: RefCell<Vec<ProcessBuilder>>,
}

impl RecordingRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `output` for commands containing `pattern`.
    pub fn respond(mut self, pattern: impl Into<String>, output: ProcessOutput) -> Self {
        self.responses.push((pattern.into(), output));
        self
    }

    /// Every command run so far.
    pub fn calls(&self) -> Vec<ProcessBuilder> {
        self.calls.borrow().clone()
    }

    /// Rendered command lines run so far.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(ProcessBuilder::display_command)
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let line = cmd.display_command();
        self.calls.borrow_mut().push(cmd.clone());

        let output = self
            .responses
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| ProcessOutput::ok(""));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_runner_matches_first_pattern() {
        let runner = RecordingRunner::new()
            .respond("build", ProcessOutput::failed(1, "nope"))
            .respond("swift", ProcessOutput::ok("5.9"));

        let build = runner.run(&ProcessBuilder::new("swift").arg("build")).unwrap();
        let version = runner
            .run(&ProcessBuilder::new("swift").arg("--version"))
            .unwrap();
        let other = runner.run(&ProcessBuilder::new("true")).unwrap();

        assert_eq!(build.status, Some(1));
        assert_eq!(version.stdout_str(), "5.9");
        assert!(other.success());
        assert_eq!(runner.commands(), vec!["swift build", "swift --version", "true"]);
    }
}
