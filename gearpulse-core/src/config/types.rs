//! Configuration type definitions
//!
//! These types represent the board configuration. The firmware embeds a
//! TOML file and parses it into [`Config`] at boot.

/// LCD backpack wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// 7-bit I2C address of the PCF8574 backpack
    pub i2c_address: u8,
    /// SDA GPIO number
    pub sda_pin: u8,
    /// SCL GPIO number
    pub scl_pin: u8,
    /// Glass width in characters (16 or 20)
    pub columns: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            i2c_address: 0x27,
            sda_pin: 4,
            scl_pin: 5,
            columns: 16,
        }
    }
}

/// Touch button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchConfig {
    /// GPIO number
    pub pin: u8,
    /// Pin reads high while touched (TTP223 default)
    pub active_high: bool,
    /// Holds at least this long are long presses
    pub long_press_ms: u32,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            pin: 15,
            active_high: true,
            long_press_ms: 2000,
        }
    }
}

/// Host serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub rx_pin: u8,
    pub tx_pin: u8,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            rx_pin: 1,
            tx_pin: 0,
        }
    }
}

/// Control loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopConfig {
    /// Interval between `Monitor::poll` calls
    pub poll_interval_ms: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
        }
    }
}

/// Divergence meter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DivergenceConfig {
    /// Offer the divergence view at all
    pub enabled: bool,
    /// Length of one reveal animation
    pub animation_ms: u32,
    /// How long a settled value is shown before the next animation
    pub hold_ms: u32,
    /// Minimum spacing of animation frames
    pub frame_ms: u32,
    /// Keep cycling while another view is shown
    pub run_hidden: bool,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            animation_ms: 15_000,
            hold_ms: 60_000,
            frame_ms: 40,
            run_hidden: true,
        }
    }
}

/// Power sequence stage durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerConfig {
    pub splash_ms: u32,
    pub starting_ms: u32,
    pub ready_ms: u32,
    pub shutdown_ms: u32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            splash_ms: 600,
            starting_ms: 1000,
            ready_ms: 1000,
            shutdown_ms: 1000,
        }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub display: DisplayConfig,
    pub touch: TouchConfig,
    pub serial: SerialConfig,
    /// `[loop]` section
    pub poll: LoopConfig,
    pub divergence: DivergenceConfig,
    pub power: PowerConfig,
}
