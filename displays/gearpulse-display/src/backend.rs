//! Character display trait
//!
//! Defines the interface for HD44780-class character LCDs.

use crate::cell::{Cell, Glyph};

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Cursor position or CGRAM slot out of range
    InvalidPosition,
    /// Display not initialized
    NotInitialized,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::Communication => f.write_str("display communication error"),
            DisplayError::InvalidPosition => f.write_str("invalid display position"),
            DisplayError::NotInitialized => f.write_str("display not initialized"),
        }
    }
}

/// Character display trait
///
/// Provides a hardware-agnostic interface for cell-addressed displays.
/// Implementations translate [`Cell`]s into controller character codes.
pub trait CharDisplay {
    /// Run the controller's power-up initialization
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear the display and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor
    ///
    /// - `col`: Column (0-based)
    /// - `row`: Row (0-based)
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    /// Write one cell at the cursor and advance it
    fn write_cell(&mut self, cell: Cell) -> Result<(), DisplayError>;

    /// Write a run of cells starting at the cursor
    fn write_cells(&mut self, cells: &[Cell]) -> Result<(), DisplayError> {
        for &cell in cells {
            self.write_cell(cell)?;
        }
        Ok(())
    }

    /// Store a 5x8 bitmap in a CGRAM slot (0-7)
    fn load_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), DisplayError>;

    /// Load every [`Glyph`] into its slot
    fn load_glyphs(&mut self) -> Result<(), DisplayError> {
        for glyph in Glyph::ALL {
            self.load_glyph(glyph.slot(), glyph.bitmap())?;
        }
        Ok(())
    }

    /// Switch the backlight
    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Get the display dimensions
    ///
    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);
}
