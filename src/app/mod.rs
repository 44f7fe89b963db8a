//! Application Layer
//!
//! User-facing CLI for offline analysis of exported trajectories.

pub mod cli;

pub use cli::Cli;
