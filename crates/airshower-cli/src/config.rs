//! Layered configuration for the CLI: command-line arguments over an optional TOML file
//! over built-in defaults.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::{build_config, resolve_input_path};
pub use models::AppConfig;
