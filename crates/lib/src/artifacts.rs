//! Discovery of build outputs for the final report.
//!
//! Missing artifacts are reported by omission. A build whose tools exited zero
//! is a success even if nothing is found here.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use walkdir::WalkDir;

use crate::config::BuildConfig;
use crate::consts::{DOCS_INDEX, DOCS_SEARCH_ROOT, LIBRARY_ARTIFACT, TESTS_ARTIFACT};

/// Locations of the produced artifacts, where they could be found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Artifacts {
  pub library: Option<PathBuf>,
  pub tests: Option<PathBuf>,
  pub tutorials: Option<PathBuf>,
}

impl Artifacts {
  pub fn is_empty(&self) -> bool {
    self.library.is_none() && self.tests.is_none() && self.tutorials.is_none()
  }
}

/// Look for the artifacts that `config` asked for.
pub fn locate_artifacts(config: &BuildConfig) -> Artifacts {
  let library = existing_file(config.build_path(&LIBRARY_ARTIFACT));
  if let Some(path) = &library {
    info!("OpenCV.js location: {}", path.display());
  }

  let tests = if config.build_tests {
    existing_file(config.build_path(&TESTS_ARTIFACT))
  } else {
    None
  };
  if let Some(path) = &tests {
    info!("OpenCV.js tests location: {}", path.display());
  }

  let tutorials = if config.build_docs {
    find_file(DOCS_INDEX, &config.build_path(&DOCS_SEARCH_ROOT))
  } else {
    None
  };
  if let Some(path) = &tutorials {
    info!("OpenCV.js tutorials location: {}", path.display());
  }

  Artifacts {
    library,
    tests,
    tutorials,
  }
}

/// First regular file called `name` under `root`.
///
/// The walk is top-down: the files of a directory are checked, in name order,
/// before any of its subdirectories, so a match at `root` wins over a nested
/// one. Unreadable entries and a missing `root` yield `None`.
pub fn find_file(name: &str, root: &Path) -> Option<PathBuf> {
  WalkDir::new(root)
    .sort_by(|a, b| {
      a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
    })
    .into_iter()
    .filter_map(Result::ok)
    .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
    .map(|entry| entry.into_path())
}

fn existing_file(path: PathBuf) -> Option<PathBuf> {
  path.is_file().then_some(path)
}
