//! Step sequencing for an OpenCV.js build.
//!
//! A build is a linear list of [`Step`]s derived from the [`BuildConfig`]:
//! optional clean, optional configure, then (unless configure-only) the library,
//! tests and documentation targets. The first failing step aborts the rest.

pub mod clean;
pub mod cmake;
pub mod make;

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::artifacts::{Artifacts, locate_artifacts};
use crate::config::{BuildConfig, ConfigError};
use crate::consts::{DOCS_TARGET, LIBRARY_TARGET, TESTS_TARGET};
use crate::execute::{CommandRunner, ExecutionError, Invocation};

pub use clean::{CleanError, clean_build_dir};
pub use cmake::{CMakeOption, InvalidOptionName, compiler_flags, configure_invocation};
pub use make::make_invocation;

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The configuration could not be validated.
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// An external command failed.
  #[error("{step} step failed")]
  Step {
    step: Step,
    #[source]
    source: ExecutionError,
  },

  /// A generated entry in the build directory could not be removed.
  #[error(transparent)]
  Clean(#[from] CleanError),

  /// The configure command could not be assembled.
  #[error(transparent)]
  InvalidOption(#[from] InvalidOptionName),
}

/// One stage of the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
  Clean,
  Configure,
  BuildLibrary,
  BuildTests,
  BuildDocs,
}

impl Step {
  /// Banner logged before the step runs.
  pub fn banner(self, config: &BuildConfig) -> String {
    match self {
      Step::Clean => format!("Clean build dir {}", config.build_dir.display()),
      Step::Configure => format!("Config OpenCV.js build for {}", config.target),
      Step::BuildLibrary => "Building OpenCV.js".to_string(),
      Step::BuildTests => "Building OpenCV.js tests".to_string(),
      Step::BuildDocs => "Building OpenCV.js tutorials".to_string(),
    }
  }

  /// External command for the step. `Clean` runs in-process and has none.
  pub fn invocation(self, config: &BuildConfig) -> Result<Option<Invocation>, BuildError> {
    let invocation = match self {
      Step::Clean => return Ok(None),
      Step::Configure => configure_invocation(config)?,
      Step::BuildLibrary => make_invocation(config, LIBRARY_TARGET),
      Step::BuildTests => make_invocation(config, TESTS_TARGET),
      Step::BuildDocs => make_invocation(config, DOCS_TARGET),
    };
    Ok(Some(invocation))
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Step::Clean => "clean",
      Step::Configure => "configure",
      Step::BuildLibrary => "build",
      Step::BuildTests => "build tests",
      Step::BuildDocs => "build docs",
    };
    f.write_str(name)
  }
}

/// The steps `config` asks for, in execution order.
pub fn plan_steps(config: &BuildConfig) -> Vec<Step> {
  let mut steps = Vec::new();
  if config.clean_build_dir {
    steps.push(Step::Clean);
  }
  if !config.skip_config {
    steps.push(Step::Configure);
  }
  if config.config_only {
    return steps;
  }
  steps.push(Step::BuildLibrary);
  if config.build_tests {
    steps.push(Step::BuildTests);
  }
  if config.build_docs {
    steps.push(Step::BuildDocs);
  }
  steps
}

/// A step with the command line it would run, for dry runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
  pub step: Step,
  pub banner: String,
  pub command: Option<Invocation>,
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
  pub steps: Vec<Step>,
  /// `None` after a configure-only run.
  pub artifacts: Option<Artifacts>,
}

/// Drives the steps of one build through a [`CommandRunner`].
pub struct Orchestrator<'a, R> {
  config: &'a BuildConfig,
  runner: R,
}

impl<'a, R: CommandRunner> Orchestrator<'a, R> {
  pub fn new(config: &'a BuildConfig, runner: R) -> Self {
    Self { config, runner }
  }

  /// Consume the orchestrator and hand back its runner.
  pub fn into_runner(self) -> R {
    self.runner
  }

  /// Every planned step with its command line, without running anything.
  pub fn plan(&self) -> Result<Vec<PlannedStep>, BuildError> {
    plan_steps(self.config)
      .into_iter()
      .map(|step| -> Result<PlannedStep, BuildError> {
        Ok(PlannedStep {
          step,
          banner: step.banner(self.config),
          command: step.invocation(self.config)?,
        })
      })
      .collect()
  }

  /// Run every planned step in order, stopping at the first failure.
  pub fn run(&mut self) -> Result<BuildOutcome, BuildError> {
    let steps = plan_steps(self.config);
    for step in &steps {
      banner(&step.banner(self.config));
      self.run_step(*step)?;
    }

    if self.config.config_only {
      return Ok(BuildOutcome {
        steps,
        artifacts: None,
      });
    }

    banner("Build finished");
    Ok(BuildOutcome {
      steps,
      artifacts: Some(locate_artifacts(self.config)),
    })
  }

  fn run_step(&mut self, step: Step) -> Result<(), BuildError> {
    match step.invocation(self.config)? {
      Some(invocation) => self
        .runner
        .run(&invocation)
        .map_err(|source| BuildError::Step { step, source }),
      None => {
        let removed = clean_build_dir(&self.config.build_dir)?;
        info!(count = removed.len(), "build dir cleaned");
        Ok(())
      }
    }
  }
}

fn banner(title: &str) {
  info!("=====");
  info!("===== {}", title);
  info!("=====");
}
