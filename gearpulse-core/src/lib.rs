//! Board-agnostic core logic for the GearPulse monitor
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - View rendering (CPU, memory, network, divergence)
//! - Divergence meter animation state machine
//! - Touch gesture classification
//! - Power-on and power-off sequencing
//! - The `Monitor` control loop tying them together
//! - Configuration types and the embedded TOML parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod config;
pub mod divergence;
pub mod input;
pub mod monitor;
pub mod power;
pub mod traits;
pub mod view;

pub use monitor::{IngestStats, Monitor};
