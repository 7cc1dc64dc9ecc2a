//! End-to-end tests that run cvjs-build against fake `cmake` and `make` tools.

mod common;

#[cfg(unix)]
mod build_tests;
