//! `make` invocations for the generated build rules.

use crate::config::BuildConfig;
use crate::execute::Invocation;

/// `make -j <jobs> <target>`, run from the build directory.
pub fn make_invocation(config: &BuildConfig, target: &str) -> Invocation {
  Invocation::new("make")
    .arg("-j")
    .arg(config.jobs.to_string())
    .arg(target)
    .current_dir(&config.build_dir)
}
