//! Command-line front end: argument parsing, command handlers, report rendering.

pub mod commands;
pub mod report;

pub use commands::{CommandOutput, FileArgs, RunArgs};
