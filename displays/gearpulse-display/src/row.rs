//! Fixed-width display rows
//!
//! A [`Row`] holds at most [`COLS`] cells. Anything pushed past the end
//! is dropped, so callers can format freely and get the same truncation
//! the glass would apply.

use core::fmt;

use heapless::Vec;

use crate::cell::{Cell, Glyph};
use crate::COLS;

/// One line of display content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<Cell, COLS>,
}

impl Row {
    /// Create an empty row
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Row of text, truncated to the display width
    pub fn from_text(text: &str) -> Self {
        let mut row = Self::new();
        row.push_str(text);
        row
    }

    /// Row of text centred in the display width
    ///
    /// Odd padding puts the extra space on the right.
    pub fn centered(text: &str) -> Self {
        let len = text.chars().count().min(COLS);
        let mut row = Self::new();
        for _ in 0..(COLS - len) / 2 {
            row.push(Cell::SPACE);
        }
        row.push_str(text);
        row
    }

    /// Row of `COLS` spaces
    pub fn blank() -> Self {
        Self::new().padded()
    }

    /// Append a cell; returns `false` if the row is already full
    pub fn push(&mut self, cell: Cell) -> bool {
        self.cells.push(cell).is_ok()
    }

    /// Append a custom glyph
    pub fn push_glyph(&mut self, glyph: Glyph) -> bool {
        self.push(Cell::Glyph(glyph))
    }

    /// Append text, dropping characters that do not fit
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            if !self.push(Cell::Char(c)) {
                break;
            }
        }
    }

    /// Copy of this row right-padded with spaces to the full width
    pub fn padded(&self) -> Self {
        let mut row = self.clone();
        while row.push(Cell::SPACE) {}
        row
    }

    /// The cells in this row
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the row is full width
    pub fn is_full(&self) -> bool {
        self.cells.is_full()
    }
}

/// Formatting into a row truncates instead of failing
impl fmt::Write for Row {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        for cell in &self.cells {
            f.write_char(cell.as_char())?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Row {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Row[");
        for cell in &self.cells {
            defmt::write!(f, "{}", cell.as_char());
        }
        defmt::write!(f, "]");
    }
}
