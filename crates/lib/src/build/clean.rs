//! Removal of generated files from the build directory.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::CLEAN_TARGETS;
use crate::util::fs::remove_path;

/// A generated entry that could not be removed.
#[derive(Debug, Error)]
#[error("failed to remove {}", path.display())]
pub struct CleanError {
  /// The entry that failed, not the build directory holding it.
  pub path: PathBuf,
  #[source]
  pub source: io::Error,
}

/// Remove the fixed set of generated entries under `build_dir`.
///
/// Entries that do not exist are skipped. Returns the paths actually removed.
pub fn clean_build_dir(build_dir: &Path) -> Result<Vec<PathBuf>, CleanError> {
  let mut removed = Vec::new();
  for name in CLEAN_TARGETS {
    let path = build_dir.join(name);
    match remove_path(&path) {
      Ok(true) => removed.push(path),
      Ok(false) => {}
      Err(source) => return Err(CleanError { path, source }),
    }
  }
  Ok(removed)
}
