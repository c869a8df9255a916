//! Utility modules: constants, logging, per-directory defaults file.

pub mod config;
pub(crate) mod defaults_toml;
pub mod logger;

pub use logger::setup_logging;
