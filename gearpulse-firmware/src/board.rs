//! Board wiring
//!
//! The LCD and the host link sit on fixed peripherals. Their pin numbers
//! in the config are checked against this wiring at boot.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;
use gearpulse_core::config::Config;
use gearpulse_core::traits::RngSource;
use gearpulse_core::Monitor;
use gearpulse_drivers::lcd::Hd44780;
use gearpulse_hal_rp2040::i2c::{controller_for_pins, HalI2c, I2cId};
use gearpulse_hal_rp2040::uart::{uart_for_pins, UartId};
use rand::rngs::SmallRng;

/// LCD I2C pins (I2C0)
pub const LCD_SDA: u8 = 4;
pub const LCD_SCL: u8 = 5;

/// Host serial pins (UART0)
pub const HOST_TX: u8 = 0;
pub const HOST_RX: u8 = 1;

/// Floating ADC input used for the random seed (ADC0)
pub const SEED_PIN: u8 = 26;

/// HD44780 on the I2C0 backpack
pub type Lcd = Hd44780<HalI2c<I2c<'static, I2C0, Blocking>>, Delay>;

/// The monitor as wired on this board
pub type BoardMonitor = Monitor<Lcd, RngSource<SmallRng>>;

/// Warn about config pins that do not match the wiring
pub fn check_wiring(config: &Config) {
    let display = &config.display;
    if controller_for_pins(display.sda_pin, display.scl_pin) != Some(I2cId::I2c0) {
        warn!(
            "gpio{}/gpio{} are not an I2C0 SDA/SCL pair",
            display.sda_pin, display.scl_pin
        );
    }
    if (display.sda_pin, display.scl_pin) != (LCD_SDA, LCD_SCL) {
        warn!(
            "LCD is wired to gpio{}/gpio{}, ignoring configured pins",
            LCD_SDA, LCD_SCL
        );
    }

    let serial = &config.serial;
    if uart_for_pins(serial.tx_pin, serial.rx_pin) != Some(UartId::Uart0) {
        warn!(
            "gpio{}/gpio{} are not a UART0 TX/RX pair",
            serial.tx_pin, serial.rx_pin
        );
    }
    if (serial.tx_pin, serial.rx_pin) != (HOST_TX, HOST_RX) {
        warn!(
            "Host serial is wired to gpio{}/gpio{}, ignoring configured pins",
            HOST_TX, HOST_RX
        );
    }

    if [LCD_SDA, LCD_SCL, HOST_TX, HOST_RX, SEED_PIN].contains(&config.touch.pin) {
        warn!("Touch pin gpio{} is already in use", config.touch.pin);
    }
}
