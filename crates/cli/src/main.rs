mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cvjs_lib::{BuildError, BuildOptions, ConfigError, TargetFormat};

use crate::cmd::{cmd_build, cmd_plan};
use crate::output::{OutputFormat, print_error};

/// Exit code when no Emscripten directory could be found.
const EXIT_TOOLCHAIN_UNRESOLVED: u8 = 255;

/// Build OpenCV.js by Emscripten
#[derive(Parser, Debug)]
#[command(name = "cvjs-build")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Building directory (and output)
  build_dir: PathBuf,

  /// OpenCV source directory (default is the current directory)
  #[arg(long = "source_dir", value_name = "DIR")]
  source_dir: Option<PathBuf>,

  /// Path to Emscripten to use for build (default is $EMSCRIPTEN)
  #[arg(long = "toolchain_dir", value_name = "DIR")]
  toolchain_dir: Option<PathBuf>,

  /// Build OpenCV.js in WebAssembly format
  #[arg(long = "build_wasm", conflicts_with = "disable_wasm")]
  build_wasm: bool,

  /// Build OpenCV.js in Asm.js format
  #[arg(long = "disable_wasm")]
  disable_wasm: bool,

  /// Build tests
  #[arg(long = "build_test")]
  build_test: bool,

  /// Build tutorials
  #[arg(long = "build_doc")]
  build_doc: bool,

  /// Clean build dir
  #[arg(long = "clean_build_dir")]
  clean_build_dir: bool,

  /// Skip cmake config
  #[arg(long = "skip_config")]
  skip_config: bool,

  /// Only do cmake config
  #[arg(long = "config_only")]
  config_only: bool,

  /// Enable exception handling
  #[arg(long = "enable_exception")]
  enable_exception: bool,

  /// Parallel make jobs (default is the number of available CPUs)
  #[arg(short, long, value_name = "N")]
  jobs: Option<usize>,

  /// Print the planned steps and commands without running them
  #[arg(long = "dry_run")]
  dry_run: bool,

  /// Report format
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn build_options(&self) -> BuildOptions {
    BuildOptions {
      build_dir: self.build_dir.clone(),
      source_dir: self.source_dir.clone(),
      toolchain_dir: self.toolchain_dir.clone(),
      target: TargetFormat::from_flags(self.build_wasm, self.disable_wasm),
      build_tests: self.build_test,
      build_docs: self.build_doc,
      clean_build_dir: self.clean_build_dir,
      skip_config: self.skip_config,
      config_only: self.config_only,
      enable_exception: self.enable_exception,
      jobs: self.jobs,
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  // RUST_LOG wins over --verbose
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  debug!(args = ?cli, "parsed arguments");

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::from(exit_code(&err))
    }
  }
}

fn run(cli: &Cli) -> Result<()> {
  let options = cli.build_options();
  if cli.dry_run {
    cmd_plan(options, cli.output)
  } else {
    cmd_build(options, cli.output)
  }
}

/// Map a failure to the process exit code.
///
/// A missing toolchain gets its own code, a failing child passes its status
/// through, and everything else is 1.
fn exit_code(err: &anyhow::Error) -> u8 {
  match err.downcast_ref::<BuildError>() {
    Some(BuildError::Config(ConfigError::ToolchainUnresolved)) => EXIT_TOOLCHAIN_UNRESOLVED,
    Some(BuildError::Step { source, .. }) => u8::try_from(source.exit_code()).unwrap_or(1),
    _ => 1,
  }
}
