//! Telemetry record decoding
//!
//! A record is parsed into a generic JSON document first, then each metric
//! is looked up by path. Lookups are lenient: a missing key, a parent that
//! is not an object or a value that is not a number all read as `0.0`.
//! Only a syntactically broken record is rejected.

use core::fmt;

use serde_json::Value;

/// Latest system metrics reported by the host
///
/// Replaced as a whole on every accepted record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// CPU load in percent
    pub cpu_load: f32,
    /// CPU package temperature in °C
    pub cpu_temp: f32,
    /// GPU load in percent
    pub gpu_load: f32,
    /// GPU temperature in °C
    pub gpu_temp: f32,
    /// Installed RAM in GB
    pub ram_total: f32,
    /// RAM in use in GB
    pub ram_used: f32,
    /// RAM in use in percent
    pub ram_percent: f32,
    /// Upload rate in bytes/s
    pub net_upload: f32,
    /// Download rate in bytes/s
    pub net_download: f32,
}

impl Snapshot {
    /// All-zero snapshot shown before the first record arrives
    pub const fn zeroed() -> Self {
        Self {
            cpu_load: 0.0,
            cpu_temp: 0.0,
            gpu_load: 0.0,
            gpu_temp: 0.0,
            ram_total: 0.0,
            ram_used: 0.0,
            ram_percent: 0.0,
            net_upload: 0.0,
            net_download: 0.0,
        }
    }
}

/// Class of a decode failure, as reported by the JSON parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCategory {
    /// Invalid token or structure
    Syntax,
    /// Record ended before the structure was closed (e.g. truncated line)
    Eof,
    /// Structurally valid JSON that could not be represented
    Data,
}

/// A record that could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeError {
    pub category: ErrorCategory,
    /// 1-based line of the failure within the record
    pub line: usize,
    /// 1-based column of the failure within the record
    pub column: usize,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.category {
            ErrorCategory::Syntax => "syntax error",
            ErrorCategory::Eof => "unexpected end of record",
            ErrorCategory::Data => "invalid data",
        };
        write!(f, "{} at {}:{}", what, self.line, self.column)
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let category = match err.classify() {
            Category::Eof => ErrorCategory::Eof,
            Category::Data => ErrorCategory::Data,
            Category::Syntax | Category::Io => ErrorCategory::Syntax,
        };
        Self {
            category,
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Paths of the nine metrics inside a record
mod path {
    pub const CPU_LOAD: &str = "/cpu/load";
    pub const CPU_TEMP: &str = "/cpu/temp";
    pub const GPU_LOAD: &str = "/gpu/load";
    pub const GPU_TEMP: &str = "/gpu/temp";
    pub const RAM_TOTAL: &str = "/ram/total";
    pub const RAM_USED: &str = "/ram/used";
    pub const RAM_PERCENT: &str = "/ram/usagePercent";
    pub const NET_UPLOAD: &str = "/network/upload";
    pub const NET_DOWNLOAD: &str = "/network/download";
}

/// Decode one line into a complete snapshot
///
/// The snapshot is only returned once every field has been read, so a
/// caller that assigns the result never exposes a half-updated value.
pub fn decode(line: &[u8]) -> Result<Snapshot, DecodeError> {
    let doc: Value = serde_json::from_slice(line)?;

    let metric = |pointer: &str| -> f32 {
        doc.pointer(pointer)
            .and_then(Value::as_f64)
            .map_or(0.0, |v| v as f32)
    };

    Ok(Snapshot {
        cpu_load: metric(path::CPU_LOAD),
        cpu_temp: metric(path::CPU_TEMP),
        gpu_load: metric(path::GPU_LOAD),
        gpu_temp: metric(path::GPU_TEMP),
        ram_total: metric(path::RAM_TOTAL),
        ram_used: metric(path::RAM_USED),
        ram_percent: metric(path::RAM_PERCENT),
        net_upload: metric(path::NET_UPLOAD),
        net_download: metric(path::NET_DOWNLOAD),
    })
}
