//! Filesystem utilities.
//!
//! Every helper returns the core `Error::Io` tagged with the offending path.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use walkdir::WalkDir;

use crate::core::errors::{Error, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    }
    Ok(())
}

/// Read a file to string.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Append text to an existing file. The file is never created.
pub fn append(path: &Path, contents: &str) -> Result<()> {
    use std::io::Write;

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| Error::io(path, e))
}

/// Copy a single file into `dst_dir`, keeping its file name.
pub fn copy_into(src: &Path, dst_dir: &Path) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| Error::not_found(src, "path has no file name"))?;
    if !src.is_file() {
        return Err(Error::not_found(src, "build artifact not found"));
    }

    ensure_dir(dst_dir)?;
    let dst = dst_dir.join(file_name);
    fs::copy(src, &dst).map_err(|e| Error::io(&dst, e))?;
    Ok(dst)
}

/// Recursively copy every file below `src` into `dst`, preserving layout.
///
/// Returns the destination paths of the copied files.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(dst)?;

    let mut copied = Vec::new();
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            Error::io(path, e.into())
        })?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Files in `dir` whose names match `pattern` (e.g. `*.so`), sorted.
pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // The directory is literal; only `pattern` may contain wildcards.
    let escaped_dir = Pattern::escape(&dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_dir).join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let entries = glob(&pattern_str).map_err(|e| {
        Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()),
        )
    })?;

    let mut results = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => results.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("glob error: {}", e),
        }
    }

    results.sort();
    Ok(results)
}

/// Join an absolute install path below a staging root.
///
/// `/usr/lib` under `/tmp/root` becomes `/tmp/root/usr/lib`.
pub fn under_root(root: &Path, path: &Path) -> PathBuf {
    let relative = path.strip_prefix("/").unwrap_or(path);
    root.join(relative)
}
