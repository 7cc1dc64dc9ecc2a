//! Fixed names and paths shared across the crate.

/// Environment variable that supplies the default Emscripten directory.
pub const TOOLCHAIN_ENV_VAR: &str = "EMSCRIPTEN";

/// Location of the CMake toolchain file, relative to the Emscripten directory.
pub const TOOLCHAIN_FILE: [&str; 4] = ["cmake", "Modules", "Platform", "Emscripten.cmake"];

/// Generated entries removed from the build directory by `--clean_build_dir`.
pub const CLEAN_TARGETS: [&str; 6] = ["CMakeCache.txt", "CMakeFiles", "bin", "libs", "lib", "modules"];

/// Make target that produces the library.
pub const LIBRARY_TARGET: &str = "opencv.js";

/// Make target that produces the test bundle.
pub const TESTS_TARGET: &str = "opencv_js_test";

/// Make target that produces the tutorials.
pub const DOCS_TARGET: &str = "doxygen";

/// Library artifact, relative to the build directory.
pub const LIBRARY_ARTIFACT: [&str; 2] = ["bin", "opencv.js"];

/// Test page, relative to the build directory.
pub const TESTS_ARTIFACT: [&str; 2] = ["bin", "tests.html"];

/// Root searched for the tutorial index, relative to the build directory.
pub const DOCS_SEARCH_ROOT: [&str; 3] = ["doc", "doxygen", "html"];

/// File name of the tutorial index page.
pub const DOCS_INDEX: &str = "tutorial_js_root.html";

/// Extra variable set for every child so make and cmake print full command lines.
pub const CHILD_ENV: (&str, &str) = ("VERBOSE", "1");
