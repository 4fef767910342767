//! GPIO pin abstractions
//!
//! Provides the digital input trait used to sample the touch sensor.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Electrical level that means "asserted" for an input
///
/// TTP223 touch modules drive their output high while touched, bare
/// buttons with a pull-up read low while pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    #[default]
    High,
    Low,
}

impl ActiveLevel {
    /// Read a pin and report whether it is asserted
    pub fn is_active<P: InputPin + ?Sized>(self, pin: &P) -> bool {
        match self {
            ActiveLevel::High => pin.is_high(),
            ActiveLevel::Low => pin.is_low(),
        }
    }
}
