//! cvjs-lib: orchestration of OpenCV.js builds with Emscripten.
//!
//! This crate provides the pieces the `cvjs-build` binary is made of:
//! - `config`: validated, immutable build configuration
//! - `build`: the configure command, make targets and step sequencing
//! - `execute`: external process invocation and exit-status translation
//! - `artifacts`: discovery of the produced files for the final report

pub mod artifacts;
pub mod build;
pub mod config;
pub mod consts;
pub mod execute;
pub mod util;

pub use artifacts::{Artifacts, locate_artifacts};
pub use build::{BuildError, BuildOutcome, Orchestrator, PlannedStep, Step, plan_steps};
pub use config::{BuildConfig, BuildOptions, ConfigError, TargetFormat};
pub use execute::{CommandRunner, ExecutionError, Invocation, SystemRunner};
