//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the display trait
//! defined in gearpulse-display:
//!
//! - HD44780 character LCD behind a PCF8574 I2C backpack

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod lcd;
