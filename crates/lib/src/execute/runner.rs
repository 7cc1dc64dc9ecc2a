//! Running invocations as child processes.

use std::process::{Command, ExitStatus};

use tracing::{debug, info};

use crate::consts::CHILD_ENV;
use crate::execute::types::{ExecMode, ExecutionError, Invocation};

/// Runs external commands on behalf of the orchestrator.
///
/// Implementations block until the command finishes and only report whether it
/// succeeded. Output streams are not captured.
pub trait CommandRunner {
  fn run(&mut self, invocation: &Invocation) -> Result<(), ExecutionError>;
}

/// Spawns real child processes with inherited stdin/stdout/stderr.
///
/// Every child sees the parent environment plus `VERBOSE=1` and any variables
/// set on the invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&mut self, invocation: &Invocation) -> Result<(), ExecutionError> {
    info!("Executing: {}", invocation);

    let mut command = build_command(invocation);
    debug!(cwd = ?invocation.cwd, mode = ?invocation.mode, "spawning process");

    let status = command
      .status()
      .map_err(|e| ExecutionError::launch(&invocation.program, &e))?;

    check_status(&invocation.program_name(), status)
  }
}

fn build_command(invocation: &Invocation) -> Command {
  let mut command = match invocation.mode {
    ExecMode::Argv => {
      let mut command = Command::new(&invocation.program);
      command.args(&invocation.args);
      command
    }
    ExecMode::Shell => {
      let (shell, shell_args) = get_shell();
      let mut command = Command::new(shell);
      command.args(shell_args).arg(invocation.script());
      command
    }
  };

  command.env(CHILD_ENV.0, CHILD_ENV.1);
  command.envs(&invocation.env);
  if let Some(dir) = &invocation.cwd {
    command.current_dir(dir);
  }
  command
}

/// Translate an exit status into success or the matching error.
fn check_status(program: &str, status: ExitStatus) -> Result<(), ExecutionError> {
  if status.success() {
    return Ok(());
  }

  if let Some(code) = status.code() {
    return Err(ExecutionError::Exited {
      program: program.to_string(),
      code,
    });
  }

  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = status.signal() {
      return Err(ExecutionError::Signaled {
        program: program.to_string(),
        signal,
      });
    }
  }

  Err(ExecutionError::Exited {
    program: program.to_string(),
    code: 1,
  })
}

/// Shell binary and the flag that passes it a script.
#[cfg(unix)]
fn get_shell() -> (&'static str, &'static [&'static str]) {
  ("/bin/sh", &["-c"])
}

#[cfg(windows)]
fn get_shell() -> (&'static str, &'static [&'static str]) {
  ("cmd.exe", &["/C"])
}
