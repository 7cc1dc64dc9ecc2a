//! Shared utilities.
//!
//! Filesystem helpers used by configuration and cleaning, plus test helpers.

pub mod fs;
