//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Fake cmake: records its arguments in the working directory.
const FAKE_CMAKE: &str = r#"#!/bin/sh
echo "cmake $*" >> calls.log
exit "${FAKE_CMAKE_EXIT:-0}"
"#;

/// Fake make: records its target and produces the matching artifact.
const FAKE_MAKE: &str = r#"#!/bin/sh
for target; do :; done
echo "make $target" >> calls.log
if [ -n "$FAKE_MAKE_FAIL_ON" ] && [ "$FAKE_MAKE_FAIL_ON" = "$target" ]; then
  exit "${FAKE_MAKE_EXIT:-2}"
fi
if [ -n "$FAKE_MAKE_NO_OUTPUT" ]; then
  exit 0
fi
case "$target" in
  opencv.js) mkdir -p bin && : > bin/opencv.js ;;
  opencv_js_test) mkdir -p bin && : > bin/tests.html ;;
  doxygen) mkdir -p doc/doxygen/html/js_tutorials && : > doc/doxygen/html/js_tutorials/tutorial_js_root.html ;;
esac
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding a source tree, an
/// Emscripten directory, a build directory and a `bin/` with the fake tools.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };
    std::fs::create_dir_all(env.source_dir()).unwrap();
    std::fs::create_dir_all(env.toolchain_dir()).unwrap();
    env.install_tool("cmake", FAKE_CMAKE);
    env.install_tool("make", FAKE_MAKE);
    env
  }

  pub fn source_dir(&self) -> PathBuf {
    self.temp.path().join("opencv")
  }

  pub fn toolchain_dir(&self) -> PathBuf {
    self.temp.path().join("emsdk")
  }

  pub fn build_dir(&self) -> PathBuf {
    self.temp.path().join("build")
  }

  pub fn tools_dir(&self) -> PathBuf {
    self.temp.path().join("tools")
  }

  /// Write a file relative to the build directory.
  pub fn write_build_file(&self, relative_path: &str, content: &str) {
    let path = self.build_dir().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Lines recorded by the fake tools, in call order.
  pub fn calls(&self) -> Vec<String> {
    match std::fs::read_to_string(self.build_dir().join("calls.log")) {
      Ok(content) => content.lines().map(str::to_string).collect(),
      Err(_) => Vec::new(),
    }
  }

  /// Recorded calls reduced to the tool and its last argument.
  pub fn call_summary(&self) -> Vec<String> {
    self
      .calls()
      .iter()
      .map(|line| {
        let mut words = line.split_whitespace();
        let tool = words.next().unwrap_or_default();
        match tool {
          "make" => line.clone(),
          _ => tool.to_string(),
        }
      })
      .collect()
  }

  /// Command for the cvjs-build binary with the fake tools first on `PATH`
  /// and `EMSCRIPTEN` pointing at the test toolchain. No arguments yet.
  pub fn bare_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("cvjs-build");
    let path = std::env::var_os("PATH").unwrap_or_default();
    let mut paths = vec![self.tools_dir()];
    paths.extend(std::env::split_paths(&path));
    cmd.env("PATH", std::env::join_paths(paths).unwrap());
    cmd.env("EMSCRIPTEN", self.toolchain_dir());
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// [`TestEnv::bare_cmd`] with the build and source directories passed in.
  pub fn cvjs_cmd(&self) -> Command {
    let mut cmd = self.bare_cmd();
    cmd.arg(self.build_dir());
    cmd.arg("--source_dir").arg(self.source_dir());
    cmd
  }

  #[cfg(unix)]
  fn install_tool(&self, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let dir = self.tools_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  #[cfg(not(unix))]
  fn install_tool(&self, _name: &str, _script: &str) {}
}

/// Canonical form of `path`, as reported by cvjs-build.
pub fn canonical(path: &Path) -> PathBuf {
  dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
