//! GearPulse Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the monitor logic and drivers
//! are written against. Chip-specific crates (currently RP2040) implement
//! them on top of their peripheral drivers, and tests implement them with
//! mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  gearpulse-core / gearpulse-drivers     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gearpulse-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ gearpulse-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Touch sensor input
//! - [`uart::UartRx`] - Telemetry byte source
//! - [`i2c::I2cBus`] - LCD backpack bus

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLevel, InputPin};
pub use i2c::I2cBus;
pub use uart::UartRx;
