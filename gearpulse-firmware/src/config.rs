//! Boot-time configuration
//!
//! gearpulse.toml is compiled into the binary. The build script has
//! already checked its syntax, so a parse failure here means a value the
//! host-side checks let through; the firmware then runs on defaults.

use defmt::*;
use gearpulse_core::config::{parse_config, Config};

/// Embedded configuration (edit gearpulse.toml and rebuild to customize)
const EMBEDDED_CONFIG: &str = include_str!("../gearpulse.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> Config {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            Config::default()
        }
    }
}
