//! Package identity URL used by the provides generator.

use std::fmt;

use anyhow::{bail, Context, Result};
use url::Url;

/// The git URL identifying a package: the project URL with `.git` appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUrl(String);

impl PackageUrl {
    /// `https://github.com/apple/swift-log` => `https://github.com/apple/swift-log.git`
    pub fn https(project_url: &str) -> Self {
        let base = project_url.trim_end_matches('/');
        if base.ends_with(".git") {
            PackageUrl(base.to_string())
        } else {
            PackageUrl(format!("{}.git", base))
        }
    }

    /// Rewrite into scp-like SSH form: `git@github.com:apple/swift-log.git`.
    pub fn ssh(&self) -> Result<Self> {
        let url = Url::parse(&self.0)
            .with_context(|| format!("invalid package URL `{}`", self.0))?;

        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "cannot rewrite `{}` to SSH form: expected an http(s) URL",
                self.0
            );
        }
        let host = url
            .host_str()
            .with_context(|| format!("package URL `{}` has no host", self.0))?;

        let path = url.path().trim_start_matches('/');
        Ok(PackageUrl(format!("git@{}:{}", host, path)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_appends_git() {
        assert_eq!(
            PackageUrl::https("https://github.com/apple/swift-log").as_str(),
            "https://github.com/apple/swift-log.git"
        );
        assert_eq!(
            PackageUrl::https("https://github.com/apple/swift-log.git/").as_str(),
            "https://github.com/apple/swift-log.git"
        );
    }

    #[test]
    fn test_ssh_rewrite() {
        let url = PackageUrl::https("https://github.com/a/b").ssh().unwrap();
        assert_eq!(url.as_str(), "git@github.com:a/b.git");

        let url = PackageUrl::https("http://git.example.org/group/sub/repo")
            .ssh()
            .unwrap();
        assert_eq!(url.as_str(), "git@git.example.org:group/sub/repo.git");
    }

    #[test]
    fn test_ssh_rejects_other_schemes() {
        assert!(PackageUrl::https("file:///srv/repo").ssh().is_err());
        assert!(PackageUrl::https("not a url").ssh().is_err());
    }
}
