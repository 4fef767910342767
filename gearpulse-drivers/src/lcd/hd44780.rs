//! HD44780 character LCD driver
//!
//! Drives a 16x2 (or 20x2) HD44780 in 4-bit mode through a PCF8574
//! backpack. All writes are blocking; the controller is never polled for
//! its busy flag, so the slow commands are covered by fixed delays.
//!
//! # Character mapping
//!
//! - Custom glyphs map to their CGRAM slot (0x00-0x07)
//! - `°` maps to 0xDF in the A00 character ROM
//! - Printable ASCII maps to itself
//! - Anything else is shown as `?`

use embedded_hal::delay::DelayNs;
use gearpulse_display::{Cell, CharDisplay, DisplayError};
use gearpulse_hal::I2cBus;

use super::pcf8574::{Backpack, Register};

/// Controller instruction set
pub mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    /// Increment, no shift
    pub const ENTRY_MODE: u8 = 0x06;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// 4-bit bus, two lines, 5x8 font
    pub const FUNCTION_SET: u8 = 0x28;
    pub const SET_CGRAM: u8 = 0x40;
    pub const SET_DDRAM: u8 = 0x80;
}

/// DDRAM address of the first column of each line
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// ROM code for the degree sign
const DEGREE: u8 = 0xDF;

/// Number of CGRAM slots
const GLYPH_SLOTS: u8 = 8;

/// HD44780 driver
pub struct Hd44780<I: I2cBus, D: DelayNs> {
    bus: Backpack<I>,
    delay: D,
    columns: u8,
    initialized: bool,
}

impl<I: I2cBus, D: DelayNs> Hd44780<I, D> {
    /// Create a new driver
    ///
    /// `columns` is the panel width (16 or 20). Call [`CharDisplay::init`]
    /// before anything else.
    pub fn new(i2c: I, delay: D, address: u8, columns: u8) -> Self {
        Self {
            bus: Backpack::new(i2c, address),
            delay,
            columns,
            initialized: false,
        }
    }

    /// Check if the controller has been initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Translate a cell into its character ROM code
    pub fn char_code(cell: Cell) -> u8 {
        match cell {
            Cell::Glyph(glyph) => glyph.slot(),
            Cell::Char('°') => DEGREE,
            Cell::Char(c) if (' '..='~').contains(&c) => c as u8,
            Cell::Char(_) => b'?',
        }
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.bus.write_byte(value, Register::Command)
    }

    fn data(&mut self, value: u8) -> Result<(), DisplayError> {
        self.bus.write_byte(value, Register::Data)
    }
}

impl<I: I2cBus, D: DelayNs> CharDisplay for Hd44780<I, D> {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.initialized = false;

        // Power-on settle, then park the expander with everything low
        self.delay.delay_ms(50);
        self.bus.set_backlight(false)?;
        self.delay.delay_ms(1);

        // Force 8-bit mode three times so the controller resyncs from any
        // nibble phase, then drop to 4-bit
        self.bus.write_nibble(0x30, Register::Command)?;
        self.delay.delay_us(4500);
        self.bus.write_nibble(0x30, Register::Command)?;
        self.delay.delay_us(4500);
        self.bus.write_nibble(0x30, Register::Command)?;
        self.delay.delay_us(150);
        self.bus.write_nibble(0x20, Register::Command)?;
        self.delay.delay_us(150);

        self.command(cmd::FUNCTION_SET)?;
        self.command(cmd::DISPLAY_ON)?;
        self.command(cmd::CLEAR)?;
        self.delay.delay_ms(2);
        self.command(cmd::ENTRY_MODE)?;
        self.command(cmd::HOME)?;
        self.delay.delay_ms(2);

        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.command(cmd::CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        let offset = ROW_OFFSETS
            .get(row as usize)
            .ok_or(DisplayError::InvalidPosition)?;
        if col >= self.columns {
            return Err(DisplayError::InvalidPosition);
        }
        self.command(cmd::SET_DDRAM | (offset + col))
    }

    fn write_cell(&mut self, cell: Cell) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.data(Self::char_code(cell))
    }

    fn load_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        if slot >= GLYPH_SLOTS {
            return Err(DisplayError::InvalidPosition);
        }
        self.command(cmd::SET_CGRAM | (slot << 3))?;
        for &line in bitmap {
            self.data(line & 0x1F)?;
        }
        // Leave the address counter in DDRAM so plain writes land on screen
        self.command(cmd::SET_DDRAM)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.bus.set_backlight(on)
    }

    fn dimensions(&self) -> (u8, u8) {
        (self.columns, ROW_OFFSETS.len() as u8)
    }
}
