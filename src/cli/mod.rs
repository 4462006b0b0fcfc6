//! Command-line interface
//!
//! Argument definitions and command handlers for the `podium` binary.

pub mod args;
pub mod commands;
