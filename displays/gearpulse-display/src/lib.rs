//! Character display abstraction for GearPulse
//!
//! This crate provides:
//! - `CharDisplay` trait for 16x2 character LCDs (HD44780 and friends)
//! - `Cell`/`Glyph`: a tagged cell model, so a custom glyph can never be
//!   confused with a printable character of the same code
//! - `Row`: a fixed-width line of cells
//! - `RowCache`: the write-through cache that suppresses redundant writes
//!
//! # Architecture
//!
//! The monitor logic builds `Row`s and hands them to the `RowCache`, which
//! compares them with what is already on the glass and only touches the
//! display when something changed. Drivers implement `CharDisplay` and
//! translate cells into controller codes.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod cell;
pub mod differ;
pub mod row;

// Re-export key types
pub use backend::{CharDisplay, DisplayError};
pub use cell::{Cell, Glyph};
pub use differ::{RowCache, WriteStats};
pub use row::Row;

/// Number of character rows on the display
pub const ROWS: usize = 2;

/// Number of character columns on the display
pub const COLS: usize = 16;
