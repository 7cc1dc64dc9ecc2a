//! Directory validation and removal helpers.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ConfigError;

/// Validate that `path` is a directory and return its canonical absolute form.
///
/// Relative paths resolve against the current directory. When `create` is set
/// and nothing exists at `path`, the directory (and its parents) is created
/// first. A path that exists but is not a directory is always an error.
pub fn check_dir(path: &Path, create: bool) -> Result<PathBuf, ConfigError> {
  let absolute = std::path::absolute(path).map_err(|source| ConfigError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  debug!(path = %absolute.display(), create, "checking directory");

  match std::fs::metadata(&absolute) {
    Ok(meta) if meta.is_dir() => {}
    Ok(_) => return Err(ConfigError::NotADirectory(absolute)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      if !create {
        return Err(ConfigError::NotFound(absolute));
      }
      info!(path = %absolute.display(), "creating directory");
      std::fs::create_dir_all(&absolute).map_err(|source| ConfigError::Create {
        path: absolute.clone(),
        source,
      })?;
    }
    Err(source) => return Err(ConfigError::Io { path: absolute, source }),
  }

  dunce::canonicalize(&absolute).map_err(|source| ConfigError::Io { path: absolute, source })
}

/// Remove a file or directory tree at `path`.
///
/// Returns `Ok(false)` when nothing exists there. Symlinks are unlinked, not followed.
pub fn remove_path(path: &Path) -> io::Result<bool> {
  let meta = match std::fs::symlink_metadata(path) {
    Ok(meta) => meta,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
    Err(e) => return Err(e),
  };

  if meta.is_dir() {
    info!(path = %path.display(), "removing dir");
    std::fs::remove_dir_all(path)?;
  } else {
    info!(path = %path.display(), "removing file");
    std::fs::remove_file(path)?;
  }
  Ok(true)
}
