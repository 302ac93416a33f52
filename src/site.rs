//! Site source directory handling.
//!
//! A [`SiteSource`] is the root of a template tree. It is validated once when a
//! build or serve session starts and stays immutable afterwards.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Fatal conditions detected before a session starts.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("source `{0}` is not a valid directory")]
    InvalidSource(PathBuf),

    #[error("target `{0}` already exists")]
    TargetExists(PathBuf),
}

/// Validated root directory of a site.
#[derive(Debug, Clone)]
pub struct SiteSource {
    root: PathBuf,
}

impl SiteSource {
    /// Open a site source, failing if `path` is not an existing directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SiteError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(SiteError::InvalidSource(path.to_path_buf()));
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// Fail if a build target is already present on disk.
    pub fn ensure_fresh_target(path: impl AsRef<Path>) -> Result<(), SiteError> {
        let path = path.as_ref();
        // symlink_metadata also catches dangling links
        if path.symlink_metadata().is_ok() {
            return Err(SiteError::TargetExists(path.to_path_buf()));
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a `/`-separated relative path onto the root.
    ///
    /// `None` unless `relative` stays below the root. The string is joined
    /// as-is, so a trailing slash survives and a later `is_file` check on it
    /// fails.
    pub fn join(&self, relative: &str) -> Option<PathBuf> {
        safe_join(&self.root, relative)
    }

    /// True iff `relative` names a regular file under the root.
    pub fn is_file(&self, relative: &str) -> bool {
        self.join(relative).is_some_and(|path| path.is_file())
    }
}

/// Join `relative` onto `root` if it only has plain name components.
///
/// Absolute paths, drive prefixes, `.` and `..` are rejected, since
/// `PathBuf::join` would otherwise let them escape `root`.
pub fn safe_join(root: &Path, relative: &str) -> Option<PathBuf> {
    let path = Path::new(relative);
    let plain = path
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    (plain && path.components().next().is_some()).then(|| root.join(relative))
}

/// Render a path relative to `base` with `/` separators on every platform.
pub fn relative_slash_path(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Option<Vec<&str>> = rel
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    Some(parts?.join("/"))
}
