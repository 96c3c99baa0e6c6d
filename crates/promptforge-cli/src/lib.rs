//! promptforge CLI library
//!
//! Argument definitions and subcommand implementations for the `pforge`
//! binary.

pub mod cli;
pub mod commands;
