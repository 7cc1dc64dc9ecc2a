//! Build configuration.
//!
//! [`BuildOptions`] is the raw user input; [`BuildConfig::resolve`] validates it
//! once, applying defaults and the `EMSCRIPTEN` fallback, and produces the
//! immutable [`BuildConfig`] the rest of the crate works from.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::{TOOLCHAIN_ENV_VAR, TOOLCHAIN_FILE};
use crate::util::fs::check_dir;

/// Errors raised while validating the build configuration.
///
/// All of these are fatal and are raised before any external process runs.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Neither `--toolchain_dir` nor the environment variable supplied a toolchain.
  #[error(
    "cannot get Emscripten path, please specify it either by EMSCRIPTEN environment variable or --toolchain_dir option"
  )]
  ToolchainUnresolved,

  /// A required directory does not exist.
  #[error("directory not found: {}", .0.display())]
  NotFound(PathBuf),

  /// The path exists but is not a directory.
  #[error("not a directory: {}", .0.display())]
  NotADirectory(PathBuf),

  /// The build directory could not be created.
  #[error("failed to create directory {}", path.display())]
  Create { path: PathBuf, source: std::io::Error },

  /// Any other I/O failure while inspecting a path.
  #[error("failed to access {}", path.display())]
  Io { path: PathBuf, source: std::io::Error },

  /// A job count of zero was requested.
  #[error("job count must be at least 1")]
  InvalidJobs,
}

/// Output format selected for the compiled library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFormat {
  /// Leave the choice to the toolchain.
  #[default]
  Default,
  /// WebAssembly (`-s WASM=1`).
  Wasm,
  /// asm.js (`-s WASM=0`).
  AsmJs,
}

impl TargetFormat {
  /// Pick the format from the two command-line selectors. `build_wasm` wins if both are set.
  pub fn from_flags(build_wasm: bool, disable_wasm: bool) -> Self {
    if build_wasm {
      TargetFormat::Wasm
    } else if disable_wasm {
      TargetFormat::AsmJs
    } else {
      TargetFormat::Default
    }
  }
}

impl fmt::Display for TargetFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetFormat::Default => write!(f, "default target"),
      TargetFormat::Wasm => write!(f, "wasm"),
      TargetFormat::AsmJs => write!(f, "asm.js"),
    }
  }
}

/// Unvalidated build options, as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  /// Build (and output) directory. Created if absent.
  pub build_dir: PathBuf,
  /// OpenCV source directory. Defaults to the current directory.
  pub source_dir: Option<PathBuf>,
  /// Emscripten directory. Falls back to `$EMSCRIPTEN`.
  pub toolchain_dir: Option<PathBuf>,
  pub target: TargetFormat,
  pub build_tests: bool,
  pub build_docs: bool,
  pub clean_build_dir: bool,
  pub skip_config: bool,
  pub config_only: bool,
  pub enable_exception: bool,
  /// Parallel jobs passed to make. Defaults to the available parallelism.
  pub jobs: Option<usize>,
}

/// Validated, immutable build configuration.
///
/// All paths are absolute and canonical and are known to be directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
  pub build_dir: PathBuf,
  pub source_dir: PathBuf,
  pub toolchain_dir: PathBuf,
  pub target: TargetFormat,
  pub build_tests: bool,
  pub build_docs: bool,
  pub clean_build_dir: bool,
  pub skip_config: bool,
  pub config_only: bool,
  pub enable_exception: bool,
  pub jobs: usize,
}

impl BuildConfig {
  /// Validate `options` and resolve every default.
  ///
  /// The toolchain is resolved first, so a missing toolchain aborts before the
  /// build directory is created.
  pub fn resolve(options: BuildOptions) -> Result<Self, ConfigError> {
    let toolchain = resolve_toolchain_dir(options.toolchain_dir)?;

    let jobs = match options.jobs {
      Some(0) => return Err(ConfigError::InvalidJobs),
      Some(n) => n,
      None => default_jobs(),
    };

    let source = match options.source_dir {
      Some(dir) => dir,
      None => std::env::current_dir().map_err(|source| ConfigError::Io {
        path: PathBuf::from("."),
        source,
      })?,
    };

    let config = Self {
      build_dir: check_dir(&options.build_dir, true)?,
      source_dir: check_dir(&source, false)?,
      toolchain_dir: check_dir(&toolchain, false)?,
      target: options.target,
      build_tests: options.build_tests,
      build_docs: options.build_docs,
      clean_build_dir: options.clean_build_dir,
      skip_config: options.skip_config,
      config_only: options.config_only,
      enable_exception: options.enable_exception,
      jobs,
    };
    debug!(?config, "resolved build configuration");
    Ok(config)
  }

  /// Path of the Emscripten CMake toolchain file.
  pub fn toolchain_file(&self) -> PathBuf {
    join_all(&self.toolchain_dir, &TOOLCHAIN_FILE)
  }

  /// Join a fixed relative path onto the build directory.
  pub fn build_path(&self, parts: &[&str]) -> PathBuf {
    join_all(&self.build_dir, parts)
  }
}

/// Resolve the toolchain directory from an explicit value or `$EMSCRIPTEN`.
///
/// The explicit value always wins. An empty environment variable counts as unset.
pub fn resolve_toolchain_dir(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
  if let Some(dir) = explicit {
    return Ok(dir);
  }
  match std::env::var_os(TOOLCHAIN_ENV_VAR) {
    Some(value) if !value.is_empty() => {
      debug!(var = TOOLCHAIN_ENV_VAR, "toolchain taken from environment");
      Ok(PathBuf::from(value))
    }
    _ => Err(ConfigError::ToolchainUnresolved),
  }
}

fn join_all(base: &Path, parts: &[&str]) -> PathBuf {
  parts.iter().fold(base.to_path_buf(), |p, part| p.join(part))
}

fn default_jobs() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
