//! The CMake configure command.
//!
//! Options are typed `-D<NAME>=<VALUE>` pairs, validated when they are added and
//! serialized to one argv token each. Nothing is ever shell-quoted, and path
//! values stay OS strings all the way to the child.

use std::ffi::{OsStr, OsString};

use thiserror::Error;

use crate::config::{BuildConfig, TargetFormat};
use crate::execute::Invocation;

/// A CMake cache entry name was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid CMake option name: {0:?}")]
pub struct InvalidOptionName(pub String);

/// A single `-D<NAME>=<VALUE>` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeOption {
  name: String,
  value: OsString,
}

impl CMakeOption {
  /// Names must be non-empty and made of ASCII alphanumerics and `_`. Values may be empty.
  pub fn new(name: impl Into<String>, value: impl Into<OsString>) -> Result<Self, InvalidOptionName> {
    let name = name.into();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
      return Err(InvalidOptionName(name));
    }
    Ok(Self {
      name,
      value: value.into(),
    })
  }

  /// An `ON`/`OFF` switch.
  pub fn switch(name: impl Into<String>, on: bool) -> Result<Self, InvalidOptionName> {
    Self::new(name, if on { "ON" } else { "OFF" })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn value(&self) -> &OsStr {
    &self.value
  }

  pub fn to_arg(&self) -> OsString {
    let mut arg = OsString::from(format!("-D{}=", self.name));
    arg.push(&self.value);
    arg
  }
}

/// Feature toggles applied to every build: no media, GPU or threading
/// backends, only the modules that have JavaScript bindings.
const BASELINE: &[(&str, &str)] = &[
  ("CPU_BASELINE", ""),
  ("CPU_DISPATCH", ""),
  ("CV_TRACE", "OFF"),
  ("BUILD_SHARED_LIBS", "OFF"),
  ("WITH_1394", "OFF"),
  ("WITH_ADE", "OFF"),
  ("WITH_VTK", "OFF"),
  ("WITH_EIGEN", "OFF"),
  ("WITH_FFMPEG", "OFF"),
  ("WITH_GSTREAMER", "OFF"),
  ("WITH_GTK", "OFF"),
  ("WITH_GTK_2_X", "OFF"),
  ("WITH_IPP", "OFF"),
  ("WITH_JASPER", "OFF"),
  ("WITH_JPEG", "OFF"),
  ("WITH_WEBP", "OFF"),
  ("WITH_OPENEXR", "OFF"),
  ("WITH_OPENGL", "OFF"),
  ("WITH_OPENVX", "OFF"),
  ("WITH_OPENNI", "OFF"),
  ("WITH_OPENNI2", "OFF"),
  ("WITH_PNG", "OFF"),
  ("WITH_TBB", "OFF"),
  ("WITH_PTHREADS_PF", "OFF"),
  ("WITH_TIFF", "OFF"),
  ("WITH_V4L", "OFF"),
  ("WITH_OPENCL", "OFF"),
  ("WITH_OPENCL_SVM", "OFF"),
  ("WITH_OPENCLAMDFFT", "OFF"),
  ("WITH_OPENCLAMDBLAS", "OFF"),
  ("WITH_GPHOTO2", "OFF"),
  ("WITH_LAPACK", "OFF"),
  ("WITH_ITT", "OFF"),
  ("WITH_QUIRC", "OFF"),
  ("BUILD_ZLIB", "ON"),
  ("BUILD_opencv_apps", "OFF"),
  ("BUILD_opencv_calib3d", "ON"),
  ("BUILD_opencv_dnn", "ON"),
  ("BUILD_opencv_features2d", "ON"),
  // No bindings, but other modules depend on it.
  ("BUILD_opencv_flann", "ON"),
  ("BUILD_opencv_gapi", "OFF"),
  ("BUILD_opencv_ml", "OFF"),
  ("BUILD_opencv_photo", "ON"),
  ("BUILD_opencv_imgcodecs", "OFF"),
  ("BUILD_opencv_shape", "OFF"),
  ("BUILD_opencv_videoio", "OFF"),
  ("BUILD_opencv_videostab", "OFF"),
  ("BUILD_opencv_highgui", "OFF"),
  ("BUILD_opencv_superres", "OFF"),
  ("BUILD_opencv_stitching", "OFF"),
  ("BUILD_opencv_java", "OFF"),
  ("BUILD_opencv_java_bindings_generator", "OFF"),
  ("BUILD_opencv_js", "ON"),
  ("BUILD_opencv_python2", "OFF"),
  ("BUILD_opencv_python3", "OFF"),
  ("BUILD_opencv_python_bindings_generator", "OFF"),
  ("BUILD_EXAMPLES", "OFF"),
  ("BUILD_PACKAGE", "OFF"),
  ("BUILD_TESTS", "OFF"),
  ("BUILD_PERF_TESTS", "OFF"),
];

/// The ordered option list for `config`.
pub fn configure_options(config: &BuildConfig) -> Result<Vec<CMakeOption>, InvalidOptionName> {
  let mut options = vec![
    CMakeOption::new("CMAKE_BUILD_TYPE", "Release")?,
    CMakeOption::new("CMAKE_TOOLCHAIN_FILE", config.toolchain_file())?,
  ];

  for (name, value) in BASELINE {
    options.push(CMakeOption::new(*name, *value)?);
  }

  options.push(CMakeOption::switch("BUILD_DOCS", config.build_docs)?);

  let flags = compiler_flags(config);
  if !flags.is_empty() {
    options.push(CMakeOption::new("CMAKE_C_FLAGS", flags.clone())?);
    options.push(CMakeOption::new("CMAKE_CXX_FLAGS", flags)?);
  }

  Ok(options)
}

/// `cmake <options...> <source_dir>`, run from the build directory.
pub fn configure_invocation(config: &BuildConfig) -> Result<Invocation, InvalidOptionName> {
  let options = configure_options(config)?;
  Ok(
    Invocation::new("cmake")
      .args(options.iter().map(CMakeOption::to_arg))
      .arg(&config.source_dir)
      .current_dir(&config.build_dir),
  )
}

/// Emscripten settings passed as both C and C++ flags.
pub fn compiler_flags(config: &BuildConfig) -> String {
  let mut flags = vec!["-s USE_PTHREADS=0"];
  match config.target {
    TargetFormat::Wasm => flags.push("-s WASM=1"),
    TargetFormat::AsmJs => flags.push("-s WASM=0"),
    TargetFormat::Default => {}
  }
  if config.enable_exception {
    flags.push("-s DISABLE_EXCEPTION_CATCHING=0");
  }
  flags.join(" ")
}
