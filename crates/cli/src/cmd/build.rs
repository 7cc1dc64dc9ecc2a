//! The default `cvjs-build` action.
//!
//! Validates the configuration, runs the planned steps and reports where the
//! artifacts ended up.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use cvjs_lib::{Artifacts, BuildConfig, BuildError, BuildOptions, Orchestrator, Step, SystemRunner};

use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

#[derive(Serialize)]
struct BuildReport<'a> {
  config: &'a BuildConfig,
  steps: &'a [Step],
  artifacts: Option<&'a Artifacts>,
  duration_ms: u64,
}

/// Execute a build.
///
/// Any configuration or step failure is returned as a [`BuildError`] so the
/// caller can pick the exit code.
pub fn cmd_build(options: BuildOptions, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let config = BuildConfig::resolve(options).map_err(BuildError::from)?;
  let outcome = Orchestrator::new(&config, SystemRunner).run()?;
  let elapsed = start.elapsed();

  if output.is_json() {
    return print_json(&BuildReport {
      config: &config,
      steps: &outcome.steps,
      artifacts: outcome.artifacts.as_ref(),
      duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    });
  }

  println!();
  match &outcome.artifacts {
    None => print_success("Configuration complete"),
    Some(artifacts) => {
      print_success("Build complete!");
      if let Some(path) = &artifacts.library {
        print_stat("OpenCV.js", &path.display().to_string());
      }
      if let Some(path) = &artifacts.tests {
        print_stat("Tests", &path.display().to_string());
      }
      if let Some(path) = &artifacts.tutorials {
        print_stat("Tutorials", &path.display().to_string());
      }
    }
  }
  print_stat("Build dir", &config.build_dir.display().to_string());
  print_stat("Duration", &format_duration(elapsed));

  Ok(())
}
