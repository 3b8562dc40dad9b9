//! Sequential script runner.
//!
//! Runs a fixed, ordered list of scripts through an external interpreter,
//! tees each script's output to the console and a per-run log file, then
//! moves a fixed list of data files into an archive directory. Everything
//! here is driven by an explicit [`config::RunnerConfig`].

pub mod archive;
pub mod config;
pub mod error;
pub mod executor;
pub mod job;
pub mod runner;
pub mod tee;
