//! I2C bus adapter and pin-function table
//!
//! Any blocking `embedded-hal` I2C master (embassy-rp's blocking `I2c`
//! included) can drive the LCD backpack through [`HalI2c`].

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use gearpulse_hal::i2c::I2cConfig;
use gearpulse_hal::I2cBus;

/// I2C controller identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cId {
    I2c0,
    I2c1,
}

/// I2C transfer failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// No device answered at the address
    AddressNack,
    /// Device stopped acknowledging mid-transfer
    DataNack,
    /// Bus error or lost arbitration
    Bus,
    Other,
}

impl From<ErrorKind> for I2cError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => I2cError::AddressNack,
            ErrorKind::NoAcknowledge(_) => I2cError::DataNack,
            ErrorKind::Bus | ErrorKind::ArbitrationLoss => I2cError::Bus,
            _ => I2cError::Other,
        }
    }
}

/// [`I2cBus`] over an `embedded-hal` I2C master
pub struct HalI2c<B> {
    bus: B,
}

impl<B: I2c> HalI2c<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: I2c> I2cBus for HalI2c<B> {
    type Error = I2cError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cError> {
        self.bus
            .write(address, data)
            .map_err(|e| I2cError::from(e.kind()))
    }
}

/// embassy-rp controller config for a bus speed
pub fn controller_config(config: I2cConfig) -> embassy_rp::i2c::Config {
    let mut cfg = embassy_rp::i2c::Config::default();
    cfg.frequency = config.frequency;
    cfg
}

/// Determine which controller a SDA/SCL pin pair belongs to
///
/// Pin functions repeat every four GPIOs: SDA0, SCL0, SDA1, SCL1.
pub fn controller_for_pins(sda: u8, scl: u8) -> Option<I2cId> {
    if sda >= 30 || scl >= 30 {
        return None;
    }
    match (sda % 4, scl % 4) {
        (0, 1) => Some(I2cId::I2c0),
        (2, 3) => Some(I2cId::I2c1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_for_pins() {
        assert_eq!(controller_for_pins(4, 5), Some(I2cId::I2c0));
        assert_eq!(controller_for_pins(0, 1), Some(I2cId::I2c0));
        assert_eq!(controller_for_pins(20, 21), Some(I2cId::I2c0));
        assert_eq!(controller_for_pins(2, 3), Some(I2cId::I2c1));
        assert_eq!(controller_for_pins(26, 27), Some(I2cId::I2c1));

        // Swapped, mismatched or out of range
        assert_eq!(controller_for_pins(5, 4), None);
        assert_eq!(controller_for_pins(4, 7), None);
        assert_eq!(controller_for_pins(28, 31), None);
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            I2cError::from(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            I2cError::AddressNack
        );
        assert_eq!(
            I2cError::from(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)),
            I2cError::DataNack
        );
        assert_eq!(I2cError::from(ErrorKind::Overrun), I2cError::Other);
    }
}
