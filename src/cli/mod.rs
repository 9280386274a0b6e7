//! Command-line interface
//!
//! Argument parsing lives in [`args`]; command execution in [`commands`].

pub mod args;
pub mod commands;
