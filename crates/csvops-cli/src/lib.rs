//! CLI library components for csvops.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod progress;
pub mod summary;
