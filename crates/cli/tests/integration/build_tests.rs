//! Build sequencing integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, canonical};

#[test]
fn default_build_configures_then_builds_library() {
  let env = TestEnv::new();

  env
    .cvjs_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete"))
    .stdout(predicate::str::contains("opencv.js"));

  assert_eq!(env.call_summary(), vec!["cmake", "make opencv.js"]);
}

#[test]
fn wasm_with_tests_runs_exactly_three_steps() {
  let env = TestEnv::new();

  env
    .cvjs_cmd()
    .args(["--build_wasm", "--build_test"])
    .assert()
    .success()
    .stdout(predicate::str::contains("tests.html"));

  assert_eq!(
    env.call_summary(),
    vec!["cmake", "make opencv.js", "make opencv_js_test"]
  );
  let cmake = &env.calls()[0];
  assert!(cmake.contains("-DCMAKE_C_FLAGS=-s USE_PTHREADS=0 -s WASM=1"));
  assert!(cmake.contains("-DBUILD_DOCS=OFF"));
  assert!(!env.calls().iter().any(|c| c.contains("doxygen")));
}

#[test]
fn config_only_stops_after_configure() {
  let env = TestEnv::new();

  env
    .cvjs_cmd()
    .args(["--config_only", "--build_test", "--build_doc"])
    .assert()
    .success()
    .code(0)
    .stdout(predicate::str::contains("Configuration complete"));

  assert_eq!(env.call_summary(), vec!["cmake"]);
}

#[test]
fn skip_config_with_clean_cleans_then_builds() {
  let env = TestEnv::new();
  env.write_build_file("CMakeCache.txt", "stale");
  env.write_build_file("CMakeFiles/marker", "stale");
  env.write_build_file("Makefile", "keep");

  env
    .cvjs_cmd()
    .args(["--skip_config", "--clean_build_dir"])
    .assert()
    .success();

  assert_eq!(env.call_summary(), vec!["make opencv.js"]);
  assert!(!env.build_dir().join("CMakeCache.txt").exists());
  assert!(!env.build_dir().join("CMakeFiles").exists());
  assert!(env.build_dir().join("Makefile").exists());
}

#[test]
fn docs_are_built_and_located() {
  let env = TestEnv::new();

  env
    .cvjs_cmd()
    .args(["--build_doc", "--enable_exception"])
    .assert()
    .success()
    .stdout(predicate::str::contains("tutorial_js_root.html"));

  assert_eq!(env.call_summary(), vec!["cmake", "make opencv.js", "make doxygen"]);
  let cmake = &env.calls()[0];
  assert!(cmake.contains("-DBUILD_DOCS=ON"));
  assert!(cmake.contains("-s DISABLE_EXCEPTION_CATCHING=0"));
}

#[test]
fn failing_step_propagates_exit_code_and_stops() {
  let env = TestEnv::new();

  env
    .cvjs_cmd()
    .env("FAKE_MAKE_FAIL_ON", "opencv.js")
    .env("FAKE_MAKE_EXIT", "7")
    .arg("--build_test")
    .assert()
    .failure()
    .code(7)
    .stderr(predicate::str::contains("child returned 7"));

  assert_eq!(env.call_summary(), vec!["cmake", "make opencv.js"]);
}

#[test]
fn failing_configure_skips_build() {
  let env = TestEnv::new();

  env
    .cvjs_cmd()
    .env("FAKE_CMAKE_EXIT", "3")
    .assert()
    .failure()
    .code(3)
    .stderr(predicate::str::contains("configure step failed"));

  assert_eq!(env.call_summary(), vec!["cmake"]);
}

#[test]
fn missing_artifacts_are_not_an_error() {
  let env = TestEnv::new();

  env
    .cvjs_cmd()
    .env("FAKE_MAKE_NO_OUTPUT", "1")
    .args(["--build_test", "--build_doc"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete"))
    .stdout(predicate::str::contains("tests.html").not());
}

#[test]
fn json_report_lists_artifacts() {
  let env = TestEnv::new();

  let assert = env
    .cvjs_cmd()
    .args(["--build_test", "--output", "json"])
    .assert()
    .success();

  let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
  let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
  let build_dir = canonical(&env.build_dir());

  assert_eq!(
    report["steps"],
    serde_json::json!(["configure", "build_library", "build_tests"])
  );
  assert_eq!(
    report["artifacts"]["library"],
    build_dir.join("bin").join("opencv.js").display().to_string()
  );
  assert_eq!(
    report["artifacts"]["tests"],
    build_dir.join("bin").join("tests.html").display().to_string()
  );
  assert!(report["artifacts"]["tutorials"].is_null());
}

#[test]
fn relative_build_dir_is_resolved() {
  let env = TestEnv::new();

  env
    .bare_cmd()
    .current_dir(env.temp.path())
    .args(["build/", "--source_dir", "opencv", "--config_only"])
    .assert()
    .success();

  assert_eq!(env.call_summary(), vec!["cmake"]);
  assert!(env.calls()[0].ends_with(&canonical(&env.source_dir()).display().to_string()));
}
