//! Planner CLI - command line tools for checking show trajectories.
//!
//! Reads waypoint JSON files, runs them through `planner-core` and prints
//! the results as JSON.

pub mod commands;
pub mod config;
pub mod io;

pub use config::Config;
