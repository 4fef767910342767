//! Dynamic pin allocation for config-driven hardware setup
//!
//! Pins not claimed by a fixed peripheral are parked in a [`PinBank`] so
//! the firmware can hand one out by the number found in the config file.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

use crate::gpio::GPIO_COUNT;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken, or never parked in the bank
    Unavailable,
}

/// Pin bank that holds GPIO pins and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl Default for PinBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PinBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT],
        }
    }

    /// Park a pin under its GPIO number
    pub fn insert(&mut self, pin_num: u8, pin: Peri<'static, AnyPin>) -> Result<(), PinError> {
        let slot = self
            .pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?;
        *slot = Some(pin);
        Ok(())
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?
            .take()
            .ok_or(PinError::Unavailable)
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin_num: u8) -> bool {
        self.pins
            .get(pin_num as usize)
            .is_some_and(|pin| pin.is_some())
    }
}
