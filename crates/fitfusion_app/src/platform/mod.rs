//! Terminal front end: reads commands from stdin, feeds the core, and prints
//! what changed.

mod app;
mod cli;
mod commands;
mod config;
mod effects;
mod logging;
mod render;

pub use app::run_app;
pub use cli::Cli;
