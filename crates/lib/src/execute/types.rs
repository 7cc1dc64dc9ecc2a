//! Types for external command execution.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use thiserror::Error;

/// How an [`Invocation`] is handed to the operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecMode {
  /// Program and arguments passed as an argument vector. No quoting involved.
  #[default]
  Argv,
  /// All tokens joined with spaces and run through the platform shell.
  Shell,
}

/// One external process call.
///
/// Program and arguments are kept as OS strings so paths reach the child
/// byte for byte. They are only converted lossily for logs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  #[serde(serialize_with = "lossy")]
  pub program: OsString,
  #[serde(serialize_with = "lossy_all")]
  pub args: Vec<OsString>,
  /// Working directory for the child. Inherited when `None`.
  pub cwd: Option<PathBuf>,
  /// Variables added on top of the inherited environment.
  pub env: BTreeMap<String, String>,
  pub mode: ExecMode,
}

impl Invocation {
  /// Create an argument-vector invocation of `program`.
  pub fn new(program: impl Into<OsString>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: BTreeMap::new(),
      mode: ExecMode::Argv,
    }
  }

  /// Create an invocation that runs `script` through the platform shell.
  pub fn shell(script: impl Into<OsString>) -> Self {
    Self {
      mode: ExecMode::Shell,
      ..Self::new(script)
    }
  }

  pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  /// All tokens, program first.
  pub fn tokens(&self) -> impl Iterator<Item = &OsStr> {
    std::iter::once(self.program.as_os_str()).chain(self.args.iter().map(OsString::as_os_str))
  }

  /// The script handed to the shell in [`ExecMode::Shell`].
  pub fn script(&self) -> OsString {
    let mut script = OsString::new();
    for (i, token) in self.tokens().enumerate() {
      if i > 0 {
        script.push(" ");
      }
      script.push(token);
    }
    script
  }

  /// Program name for error messages.
  pub fn program_name(&self) -> String {
    self.program.to_string_lossy().into_owned()
  }
}

fn lossy<S: Serializer>(value: &OsString, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(&value.to_string_lossy())
}

fn lossy_all<S: Serializer>(values: &[OsString], serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_seq(values.iter().map(|v| v.to_string_lossy()))
}

/// Human-readable command line, for logs only. Tokens containing spaces are quoted.
impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.mode == ExecMode::Shell {
      return write!(f, "{}", self.script().to_string_lossy());
    }
    for (i, token) in self.tokens().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      let token = token.to_string_lossy();
      if token.is_empty() || token.contains(char::is_whitespace) {
        write!(f, "'{}'", token)?;
      } else {
        f.write_str(&token)?;
      }
    }
    Ok(())
  }
}

/// Errors raised when an external command does not succeed.
#[derive(Debug, Error)]
pub enum ExecutionError {
  /// The child exited with a non-zero code.
  #[error("{program}: child returned {code}")]
  Exited { program: String, code: i32 },

  /// The child was killed by a signal.
  #[error("{program}: child was terminated by signal {signal}")]
  Signaled { program: String, signal: i32 },

  /// The child could not be started at all.
  #[error("{program}: execution failed: os error {errno:?} / {message}")]
  Launch {
    program: String,
    errno: Option<i32>,
    message: String,
  },
}

impl ExecutionError {
  pub(crate) fn launch(program: &OsStr, err: &std::io::Error) -> Self {
    ExecutionError::Launch {
      program: program.to_string_lossy().into_owned(),
      errno: err.raw_os_error(),
      message: err.to_string(),
    }
  }

  /// Process exit code that reports this failure to our own caller.
  ///
  /// Child exit codes are passed through (clamped to 1..=255), signals map to
  /// `128 + signal` like a shell does, and launch failures map to 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      ExecutionError::Exited { code, .. } => (*code).clamp(1, 255),
      ExecutionError::Signaled { signal, .. } => (128 + *signal).clamp(1, 255),
      ExecutionError::Launch { .. } => 1,
    }
  }
}
