//! PCF8574 I2C backpack
//!
//! The common LCD backpack wires the expander's eight outputs as:
//!
//! | Bit | Signal    |
//! |-----|-----------|
//! | P0  | RS        |
//! | P1  | RW        |
//! | P2  | EN        |
//! | P3  | Backlight |
//! | P4-P7 | D4-D7   |
//!
//! RW is held low; the controller is never read.

use gearpulse_display::DisplayError;
use gearpulse_hal::I2cBus;

/// Expander bit assignments
pub mod bits {
    pub const RS: u8 = 1 << 0;
    pub const RW: u8 = 1 << 1;
    pub const EN: u8 = 1 << 2;
    pub const BACKLIGHT: u8 = 1 << 3;
}

/// Default address of a PCF8574T backpack
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Register select for a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Command,
    Data,
}

/// 4-bit transport over the expander
pub struct Backpack<I: I2cBus> {
    i2c: I,
    address: u8,
    backlight: bool,
}

impl<I: I2cBus> Backpack<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            backlight: false,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Set the backlight bit and latch it onto the expander
    pub fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = on;
        let level = self.control(Register::Command);
        self.send(&[level])
    }

    /// Clock one nibble (upper four bits of `nibble`) into the controller
    ///
    /// Used during initialization, before 4-bit mode is established.
    pub fn write_nibble(&mut self, nibble: u8, register: Register) -> Result<(), DisplayError> {
        let frame = self.frame(nibble, register);
        self.send(&frame)
    }

    /// Send a full byte as two nibbles in one bus transaction
    pub fn write_byte(&mut self, value: u8, register: Register) -> Result<(), DisplayError> {
        let high = self.frame(value & 0xF0, register);
        let low = self.frame(value << 4, register);
        self.send(&[high[0], high[1], high[2], low[0], low[1], low[2]])
    }

    /// Release the bus
    pub fn release(self) -> I {
        self.i2c
    }

    fn control(&self, register: Register) -> u8 {
        let mut byte = 0;
        if register == Register::Data {
            byte |= bits::RS;
        }
        if self.backlight {
            byte |= bits::BACKLIGHT;
        }
        byte
    }

    /// Data set up, EN high, EN low. The controller latches on the falling
    /// edge; one byte time on the bus covers the enable pulse width.
    fn frame(&self, nibble: u8, register: Register) -> [u8; 3] {
        let base = (nibble & 0xF0) | self.control(register);
        [base, base | bits::EN, base]
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, bytes)
            .map_err(|_| DisplayError::Communication)
    }
}
