//! CLI module for the Repeat Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs, ThemeArg};
pub use display::Display;
