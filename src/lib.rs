//! Command-line front end for `websift-search`.
//!
//! The binary in `src/bin/websift.rs` only installs logging and prints;
//! argument handling and dispatch live in [`cli`] so they can be tested.

pub mod cli;

pub use cli::{Cli, Command};
