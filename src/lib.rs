//! Fetch a fixed list of URLs one after another or all at once,
//! and compare how long each strategy takes.
//!
//! The binary prints the [`report::Report`] of each run;
//! the library only returns it.
pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod report;
pub mod targets;

pub use aggregate::{run_concurrent, run_sequential, Aggregator, Mode};
pub use targets::{list_targets, parse_targets, Target};
