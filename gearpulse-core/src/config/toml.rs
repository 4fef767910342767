//! Simple TOML parser for board configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! GearPulse configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - [section] headers
//! - Key = value pairs (integer, hex integer, boolean, pin string)
//! - Comments (# ...)
//!
//! Keys that are absent keep their default value.

use super::types::Config;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidSection => f.write_str("invalid section"),
            ConfigError::UnknownKey => f.write_str("unknown key"),
            ConfigError::InvalidValue => f.write_str("invalid value"),
        }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Touch,
    Serial,
    Loop,
    Divergence,
    Power,
}

/// Parse TOML configuration into a [`Config`]
pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    validate(&config)?;
    Ok(config)
}

/// Parse a header line like "[touch]"
fn parse_section_header(line: &str) -> Result<Section, ConfigError> {
    let line = strip_comment(line);
    let name = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or(ConfigError::InvalidSection)?
        .trim();

    match name {
        "display" => Ok(Section::Display),
        "touch" => Ok(Section::Touch),
        "serial" => Ok(Section::Serial),
        "loop" => Ok(Section::Loop),
        "divergence" => Ok(Section::Divergence),
        "power" => Ok(Section::Power),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(s: &str) -> &str {
    match s.find('#') {
        Some(pos) if s[..pos].matches('"').count() % 2 == 0 => s[..pos].trim(),
        _ => s,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Remove surrounding quotes, if any
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse a decimal or `0x` hexadecimal integer, with `_` separators
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ConfigError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }

    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    };

    let n = parsed.map_err(|_| ConfigError::InvalidValue)?;
    T::try_from(n).map_err(|_| ConfigError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse a pin like "gpio15" (quoted or not) or a bare GPIO number
fn parse_pin(value: &str) -> Result<u8, ConfigError> {
    let value = parse_string(value);
    let number = value.strip_prefix("gpio").unwrap_or(value);
    let pin: u8 = number.parse().map_err(|_| ConfigError::InvalidValue)?;

    // RP2040 exposes GPIO0..=GPIO29
    if pin > 29 {
        return Err(ConfigError::InvalidValue);
    }
    Ok(pin)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut Config,
) -> Result<(), ConfigError> {
    match section {
        Section::Root => return Err(ConfigError::UnknownKey),
        Section::Display => {
            let d = &mut config.display;
            match key {
                "i2c_address" => d.i2c_address = parse_int(value)?,
                "sda_pin" => d.sda_pin = parse_pin(value)?,
                "scl_pin" => d.scl_pin = parse_pin(value)?,
                "columns" => d.columns = parse_int(value)?,
                _ => return Err(ConfigError::UnknownKey),
            }
        }
        Section::Touch => {
            let t = &mut config.touch;
            match key {
                "pin" => t.pin = parse_pin(value)?,
                "active_high" => t.active_high = parse_bool(value)?,
                "long_press_ms" => t.long_press_ms = parse_int(value)?,
                _ => return Err(ConfigError::UnknownKey),
            }
        }
        Section::Serial => {
            let s = &mut config.serial;
            match key {
                "baud_rate" => s.baud_rate = parse_int(value)?,
                "rx_pin" => s.rx_pin = parse_pin(value)?,
                "tx_pin" => s.tx_pin = parse_pin(value)?,
                _ => return Err(ConfigError::UnknownKey),
            }
        }
        Section::Loop => match key {
            "poll_interval_ms" => config.poll.poll_interval_ms = parse_int(value)?,
            _ => return Err(ConfigError::UnknownKey),
        },
        Section::Divergence => {
            let d = &mut config.divergence;
            match key {
                "enabled" => d.enabled = parse_bool(value)?,
                "animation_ms" => d.animation_ms = parse_int(value)?,
                "hold_ms" => d.hold_ms = parse_int(value)?,
                "frame_ms" => d.frame_ms = parse_int(value)?,
                "run_hidden" => d.run_hidden = parse_bool(value)?,
                _ => return Err(ConfigError::UnknownKey),
            }
        }
        Section::Power => {
            let p = &mut config.power;
            match key {
                "splash_ms" => p.splash_ms = parse_int(value)?,
                "starting_ms" => p.starting_ms = parse_int(value)?,
                "ready_ms" => p.ready_ms = parse_int(value)?,
                "shutdown_ms" => p.shutdown_ms = parse_int(value)?,
                _ => return Err(ConfigError::UnknownKey),
            }
        }
    }
    Ok(())
}

/// Reject values that parse but cannot work
fn validate(config: &Config) -> Result<(), ConfigError> {
    let valid = config.display.i2c_address <= 0x7F
        && matches!(config.display.columns, 16 | 20)
        && config.serial.baud_rate > 0
        && config.poll.poll_interval_ms > 0
        && config.divergence.animation_ms > 0;

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue)
    }
}
