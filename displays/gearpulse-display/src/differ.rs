//! Write-suppressing row cache
//!
//! The cache remembers what each row of the display shows. A row is only
//! rewritten when the proposed content differs from the cached content.
//! An unknown row (`None`) never matches, so the next update always writes.

use crate::backend::{CharDisplay, DisplayError};
use crate::row::Row;
use crate::ROWS;

/// Physical write counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteStats {
    /// Rows rewritten because the content changed
    pub row_writes: u32,
    /// Updates skipped because the row already matched
    pub skipped: u32,
    /// Full-screen messages shown
    pub messages: u32,
}

/// Last written content of every display row
#[derive(Debug, Clone, Default)]
pub struct RowCache {
    rows: [Option<Row>; ROWS],
    stats: WriteStats,
}

impl RowCache {
    /// Create a cache with every row unknown
    pub fn new() -> Self {
        Self {
            rows: core::array::from_fn(|_| None),
            stats: WriteStats::default(),
        }
    }

    /// Forget the cached content, forcing the next update of every row
    pub fn invalidate(&mut self) {
        for row in &mut self.rows {
            *row = None;
        }
    }

    /// Cached content of a row, if known
    pub fn cached(&self, row: usize) -> Option<&Row> {
        self.rows.get(row).and_then(Option::as_ref)
    }

    /// Write counters
    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Update a text row
    ///
    /// On mismatch the row is blanked first, then the content is written
    /// from column 0. Returns whether the display was touched.
    pub fn update_row<D: CharDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        row: usize,
        content: &Row,
    ) -> Result<bool, DisplayError> {
        let padded = content.padded();
        if !self.needs_write(row, &padded)? {
            return Ok(false);
        }

        // Unknown until the write completes
        self.rows[row] = None;
        display.set_cursor(0, row as u8)?;
        display.write_cells(Row::blank().cells())?;
        display.set_cursor(0, row as u8)?;
        display.write_cells(content.cells())?;

        self.commit(row, padded);
        Ok(true)
    }

    /// Update a glyph bar row
    ///
    /// Bars always span the full width, so the cells are written straight
    /// over the row without a blanking pass.
    pub fn update_bar<D: CharDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        row: usize,
        content: &Row,
    ) -> Result<bool, DisplayError> {
        let padded = content.padded();
        if !self.needs_write(row, &padded)? {
            return Ok(false);
        }

        self.rows[row] = None;
        display.set_cursor(0, row as u8)?;
        display.write_cells(padded.cells())?;

        self.commit(row, padded);
        Ok(true)
    }

    /// Show a one- or two-line message, bypassing the diff
    ///
    /// The cache is primed with what was written; an absent second line is
    /// cached as blank.
    pub fn show_message<D: CharDisplay + ?Sized>(
        &mut self,
        display: &mut D,
        line1: &str,
        line2: Option<&str>,
    ) -> Result<(), DisplayError> {
        self.invalidate();
        display.clear()?;

        let first = Row::from_text(line1);
        display.set_cursor(0, 0)?;
        display.write_cells(first.cells())?;

        let second = match line2 {
            Some(text) => {
                let row = Row::from_text(text);
                display.set_cursor(0, 1)?;
                display.write_cells(row.cells())?;
                row.padded()
            }
            None => Row::blank(),
        };

        self.rows = [Some(first.padded()), Some(second)];
        self.stats.messages = self.stats.messages.wrapping_add(1);
        Ok(())
    }

    fn needs_write(&mut self, row: usize, padded: &Row) -> Result<bool, DisplayError> {
        let cached = self.rows.get(row).ok_or(DisplayError::InvalidPosition)?;
        if cached.as_ref() == Some(padded) {
            self.stats.skipped = self.stats.skipped.wrapping_add(1);
            return Ok(false);
        }
        Ok(true)
    }

    fn commit(&mut self, row: usize, padded: Row) {
        self.rows[row] = Some(padded);
        self.stats.row_writes = self.stats.row_writes.wrapping_add(1);
    }
}
