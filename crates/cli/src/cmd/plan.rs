//! `--dry_run`: show the steps a build would take without running them.

use anyhow::Result;

use cvjs_lib::{BuildConfig, BuildError, BuildOptions, Orchestrator, SystemRunner};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_step};

pub fn cmd_plan(options: BuildOptions, output: OutputFormat) -> Result<()> {
  let config = BuildConfig::resolve(options).map_err(BuildError::from)?;
  let plan = Orchestrator::new(&config, SystemRunner).plan()?;

  if output.is_json() {
    return print_json(&plan);
  }

  print_info("Dry run - nothing will be executed");
  print_stat("Build dir", &config.build_dir.display().to_string());
  print_stat("Source dir", &config.source_dir.display().to_string());
  print_stat("Toolchain", &config.toolchain_dir.display().to_string());
  print_stat("Target", &config.target.to_string());
  println!();
  for (i, planned) in plan.iter().enumerate() {
    let command = planned.command.as_ref().map(ToString::to_string);
    print_step(i + 1, &planned.banner, command.as_deref());
  }

  Ok(())
}
