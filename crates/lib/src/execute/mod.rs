//! External process execution.
//!
//! An [`Invocation`] describes one external command; a [`CommandRunner`] runs it
//! and translates the outcome into an [`ExecutionError`]. [`SystemRunner`] is the
//! real implementation, spawning children with inherited stdio.

pub mod runner;
pub mod types;

pub use runner::{CommandRunner, SystemRunner};
pub use types::{ExecMode, ExecutionError, Invocation};
