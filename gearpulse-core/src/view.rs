//! View modes and row rendering
//!
//! Rendering is a pure function of the snapshot and the active mode. Each
//! produced line is tagged so the caller can route bar rows to the bar
//! update path of the row cache.

use core::fmt::Write;

use gearpulse_display::{Glyph, Row, COLS, ROWS};
use gearpulse_protocol::Snapshot;
use heapless::String;

use crate::divergence::DivergenceMeter;

/// Content shown on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewMode {
    /// CPU and GPU temperature and load
    #[default]
    Cpu,
    /// RAM usage with a progress bar
    Memory,
    /// Download and upload rates
    Network,
    /// Decorative divergence meter
    Divergence,
}

impl ViewMode {
    /// Next mode in the cycle
    ///
    /// `Divergence` is skipped when the meter is disabled.
    pub fn next(self, divergence_enabled: bool) -> Self {
        match self {
            ViewMode::Cpu => ViewMode::Memory,
            ViewMode::Memory => ViewMode::Network,
            ViewMode::Network if divergence_enabled => ViewMode::Divergence,
            ViewMode::Network | ViewMode::Divergence => ViewMode::Cpu,
        }
    }
}

/// One rendered display line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Text, blanked before writing
    Text(Row),
    /// Full-width glyph bar, written over the row in place
    Bar(Row),
}

impl Line {
    pub fn row(&self) -> &Row {
        match self {
            Line::Text(row) | Line::Bar(row) => row,
        }
    }
}

/// Render both rows of `mode`
///
/// The divergence view shows the meter's current screen, or blank rows if
/// the meter is not running.
pub fn render(
    mode: ViewMode,
    snapshot: &Snapshot,
    divergence: Option<&DivergenceMeter>,
) -> [Line; ROWS] {
    match mode {
        ViewMode::Cpu => cpu(snapshot),
        ViewMode::Memory => memory(snapshot),
        ViewMode::Network => network(snapshot),
        ViewMode::Divergence => match divergence {
            Some(meter) => {
                let [top, bottom] = meter.screen().clone();
                [Line::Text(top), Line::Text(bottom)]
            }
            None => [Line::Text(Row::blank()), Line::Text(Row::blank())],
        },
    }
}

/// Temperature rounded half away from zero
fn whole_degrees(temp: f32) -> i32 {
    libm::roundf(temp) as i32
}

fn load_row(label: &str, temp: f32, load: f32) -> Row {
    let mut row = Row::new();
    let _ = write!(row, "{}:  {}°C {:.1}%", label, whole_degrees(temp), load);
    row
}

/// `CPU:  67°C 45.6%` over `GPU:  50°C 12.0%`
pub fn cpu(snapshot: &Snapshot) -> [Line; ROWS] {
    [
        Line::Text(load_row("CPU", snapshot.cpu_temp, snapshot.cpu_load)),
        Line::Text(load_row("GPU", snapshot.gpu_temp, snapshot.gpu_load)),
    ]
}

/// `RAM: 12/32GB 38%` over a usage bar
pub fn memory(snapshot: &Snapshot) -> [Line; ROWS] {
    let mut top = Row::new();
    let _ = write!(
        top,
        "RAM: {}/{}GB {}%",
        snapshot.ram_used as i32, snapshot.ram_total as i32, snapshot.ram_percent as i32
    );
    [Line::Text(top), Line::Bar(bar(snapshot.ram_percent))]
}

/// Progress bar at fifth-of-a-cell resolution
///
/// `percent` is truncated and clamped to `0..=100`.
pub fn bar(percent: f32) -> Row {
    let percent = (percent as i32).clamp(0, 100) as usize;
    let units = percent * COLS * 5 / 100;
    let full = units / 5;
    let rem = units % 5;

    let mut row = Row::new();
    for i in 0..COLS {
        let fifths = if i < full {
            5
        } else if i == full && rem > 0 {
            rem as u8
        } else {
            0
        };
        row.push_glyph(Glyph::bar(fifths));
    }
    row
}

/// `NET:` over `↓:3.0M ↑:2K`
pub fn network(snapshot: &Snapshot) -> [Line; ROWS] {
    let mut bottom = Row::new();
    bottom.push_glyph(Glyph::DownArrow);
    bottom.push_str(":");
    bottom.push_str(&humanize(snapshot.net_download));
    bottom.push_str(" ");
    bottom.push_glyph(Glyph::UpArrow);
    bottom.push_str(":");
    bottom.push_str(&humanize(snapshot.net_upload));

    [Line::Text(Row::from_text("NET:")), Line::Text(bottom)]
}

/// Byte rate as `500B`, `2K` or `3.0M`
pub fn humanize(bytes_per_sec: f32) -> String<COLS> {
    const KIB: f32 = 1024.0;
    const MIB: f32 = 1024.0 * 1024.0;

    let mut out = String::new();
    // Absurd rates overflow the buffer and are cut short
    let _ = if bytes_per_sec < KIB {
        write!(out, "{:.0}B", bytes_per_sec)
    } else if bytes_per_sec < MIB {
        write!(out, "{:.0}K", bytes_per_sec / KIB)
    } else {
        write!(out, "{:.1}M", bytes_per_sec / MIB)
    };
    out
}
