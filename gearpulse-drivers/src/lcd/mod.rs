//! Character LCD drivers

pub mod hd44780;
pub mod pcf8574;

pub use hd44780::Hd44780;
pub use pcf8574::Backpack;
