//! External build and install tool invocations.

use std::path::Path;

use crate::builder::context::PipelineConfig;
use crate::core::link_name::LinkName;
use crate::util::process::ProcessBuilder;

/// Installation type passed to the unified installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallType {
    Runtime,
    Devel,
}

impl InstallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallType::Runtime => "runtime",
            InstallType::Devel => "devel",
        }
    }
}

/// Builds `swift build` command lines for a package.
#[derive(Debug, Clone, Copy)]
pub struct SwiftToolchain<'a> {
    cfg: &'a PipelineConfig,
}

impl<'a> SwiftToolchain<'a> {
    pub fn new(cfg: &'a PipelineConfig) -> Self {
        SwiftToolchain { cfg }
    }

    fn swift_build(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.cfg.swift)
            .arg("build")
            .cwd(&self.cfg.package_dir)
    }

    /// Release build with the link name passed to the linker.
    pub fn linked_build(&self, link_name: &LinkName) -> ProcessBuilder {
        self.swift_build()
            .args([
                "-Xswiftc".to_string(),
                format!("-module-link-name={}", link_name),
            ])
            .args(&self.cfg.build_flags)
    }

    /// Plain release build, used to resolve embedded dependencies first.
    pub fn plain_build(&self) -> ProcessBuilder {
        self.swift_build().args(&self.cfg.build_flags)
    }

    /// The build invocations, in order.
    ///
    /// Embed mode needs a plain build before the linked one; each must
    /// succeed before the next runs.
    pub fn build_commands(&self, link_name: &LinkName, embed: bool) -> Vec<ProcessBuilder> {
        let mut commands = Vec::with_capacity(2);
        if embed {
            commands.push(self.plain_build());
        }
        commands.push(self.linked_build(link_name));
        commands
    }
}

/// Build through the unified installer.
pub fn installer_build(program: &Path, cfg: &PipelineConfig) -> ProcessBuilder {
    ProcessBuilder::new(program)
        .arg("build")
        .arg("--build-path")
        .arg(&cfg.build_dir)
        .cwd(&cfg.package_dir)
}

/// Install through the unified installer.
pub fn installer_install(
    program: &Path,
    cfg: &PipelineConfig,
    install_type: InstallType,
) -> ProcessBuilder {
    ProcessBuilder::new(program)
        .arg("install")
        .arg("--build-path")
        .arg(&cfg.build_dir)
        .args(["--type", install_type.as_str()])
        .arg("--destdir")
        .arg(&cfg.buildroot)
        .cwd(&cfg.package_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> LinkName {
        LinkName::from_package_name("my-package").unwrap()
    }

    #[test]
    fn test_plain_mode_single_linked_build() {
        let cfg = PipelineConfig::new("/pkg", "/root");
        let cmds = SwiftToolchain::new(&cfg).build_commands(&link(), false);

        assert_eq!(cmds.len(), 1);
        assert_eq!(
            cmds[0].display_command(),
            "swift build -Xswiftc -module-link-name=mypackage -c release -Xcc -D_GNU_SOURCE"
        );
        assert_eq!(cmds[0].get_cwd(), Some(Path::new("/pkg")));
    }

    #[test]
    fn test_embed_mode_builds_twice() {
        let cfg = PipelineConfig::new("/pkg", "/root");
        let cmds = SwiftToolchain::new(&cfg).build_commands(&link(), true);

        let lines: Vec<_> = cmds.iter().map(|c| c.display_command()).collect();
        assert_eq!(
            lines,
            vec![
                "swift build -c release -Xcc -D_GNU_SOURCE",
                "swift build -Xswiftc -module-link-name=mypackage -c release -Xcc -D_GNU_SOURCE",
            ]
        );
    }

    #[test]
    fn test_installer_commands() {
        let cfg = PipelineConfig::new("/pkg", "/root");
        let program = Path::new("swift-install");

        assert_eq!(
            installer_build(program, &cfg).display_command(),
            "swift-install build --build-path /pkg/.build/release"
        );
        assert_eq!(
            installer_install(program, &cfg, InstallType::Devel).display_command(),
            "swift-install install --build-path /pkg/.build/release --type devel --destdir /root"
        );
    }
}
