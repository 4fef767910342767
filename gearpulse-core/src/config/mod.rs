//! Configuration types and parsing
//!
//! The board configuration is plain TOML parsed by a small no_std parser.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ConfigError};
pub use types::*;
