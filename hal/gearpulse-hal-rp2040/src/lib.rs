//! RP2040-specific HAL for the GearPulse firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `gearpulse-hal` traits, plus RP2040-specific functionality:
//!
//! - Touch input adapter (implements `gearpulse_hal::InputPin`)
//! - I2C bus adapter (implements `gearpulse_hal::I2cBus`)
//! - Pin bank for config-driven pin assignment
//! - UART and I2C pin-function tables for config validation
//! - ADC noise seed for the random source

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod pins;
pub mod uart;

// Re-export shared traits from gearpulse-hal for convenience
pub use gearpulse_hal::{I2cBus, InputPin};
