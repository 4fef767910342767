//! Build script for gearpulse-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates gearpulse.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate gearpulse.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=gearpulse.toml");

    let config_path = Path::new("gearpulse.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: gearpulse.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds gearpulse.toml at compile time.             ║\n\
            ║  Please create one in the gearpulse-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read gearpulse.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in gearpulse.toml                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_timing(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in gearpulse.toml                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=gearpulse.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const SECTIONS: [(&str, &[&str]); 6] = [
    ("display", &["i2c_address", "sda_pin", "scl_pin", "columns"]),
    ("touch", &["pin", "active_high", "long_press_ms"]),
    ("serial", &["baud_rate", "rx_pin", "tx_pin"]),
    ("loop", &["poll_interval_ms"]),
    (
        "divergence",
        &["enabled", "animation_ms", "hold_ms", "frame_ms", "run_hidden"],
    ),
    (
        "power",
        &["splash_ms", "starting_ms", "ready_ms", "shutdown_ms"],
    ),
];

/// Only known sections and keys may appear
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(section, _)| *section == name.as_str()) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        return;
    };

    if let Some(addr) = display.get("i2c_address") {
        match addr.as_integer() {
            Some(a) if (0..=0x7F).contains(&a) => {}
            _ => errors.push("[display] i2c_address must be a 7-bit address".into()),
        }
    }

    if let Some(columns) = display.get("columns") {
        if !matches!(columns.as_integer(), Some(16) | Some(20)) {
            errors.push("[display] columns must be 16 or 20".into());
        }
    }
}

/// Pins are "gpioN" strings or bare numbers in 0-29
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let pins = [
        ("display", "sda_pin"),
        ("display", "scl_pin"),
        ("touch", "pin"),
        ("serial", "rx_pin"),
        ("serial", "tx_pin"),
    ];

    for (section, key) in pins {
        let Some(value) = config.get(section).and_then(|s| s.get(key)) else {
            continue;
        };
        let pin = match value {
            toml::Value::Integer(n) => Some(*n),
            toml::Value::String(s) => s.strip_prefix("gpio").and_then(|n| n.parse().ok()),
            _ => None,
        };
        if !matches!(pin, Some(0..=29)) {
            errors.push(format!("[{}] {} must be gpio0-gpio29", section, key));
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let positive = [
        ("serial", "baud_rate"),
        ("loop", "poll_interval_ms"),
        ("divergence", "animation_ms"),
    ];

    for (section, key) in positive {
        if let Some(value) = config.get(section).and_then(|s| s.get(key)) {
            if !matches!(value.as_integer(), Some(n) if n > 0) {
                errors.push(format!("[{}] {} must be greater than 0", section, key));
            }
        }
    }
}
