//! Control task
//!
//! Owns the monitor and runs one poll per tick: drain the serial bytes,
//! sample the touch sensor, and let the monitor update the display.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};
use gearpulse_display::DisplayError;
use gearpulse_hal::UartRx;
use gearpulse_hal_rp2040::gpio::TouchInput;

use crate::board::BoardMonitor;
use crate::channels::SerialChunks;

/// Bytes handed to the monitor per tick
///
/// At 115200 baud a 10 ms tick receives about 115 bytes.
const POLL_BUF_SIZE: usize = 512;

/// Ticks between ingest statistics reports
const STATS_INTERVAL: u32 = 1000;

/// Minimum time between display re-init attempts
///
/// The HD44780 init sequence blocks for over 50 ms.
const REINIT_INTERVAL_MS: u32 = 1000;

/// Milliseconds since boot, wrapping after about 49 days
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Control task - drives the monitor loop
#[embassy_executor::task]
pub async fn control_task(
    mut monitor: BoardMonitor,
    touch: TouchInput<'static>,
    poll_interval_ms: u32,
) {
    info!("Control task started");

    let mut serial = SerialChunks::new();
    let mut buf = [0u8; POLL_BUF_SIZE];
    let mut ticker = Ticker::every(Duration::from_millis(poll_interval_ms.into()));
    let mut ticks: u32 = 0;
    let mut last_reinit: Option<u32> = None;

    if let Err(e) = monitor.start(now_ms()) {
        warn!("Display error during power-on: {}", e);
    }

    loop {
        ticker.next().await;

        let n = match serial.try_read(&mut buf) {
            Ok(n) => n,
            Err(never) => match never {},
        };

        let now = now_ms();
        match monitor.poll(now, touch.is_touched(), &buf[..n]) {
            Ok(()) => {}
            Err(DisplayError::NotInitialized) => {
                let due = last_reinit.map_or(true, |at| now.wrapping_sub(at) >= REINIT_INTERVAL_MS);
                if due {
                    last_reinit = Some(now);
                    match monitor.reinit_display() {
                        Ok(()) => info!("LCD re-initialized"),
                        Err(e) => warn!("LCD re-init failed: {}", e),
                    }
                }
            }
            Err(e) => warn!("Display error: {}", e),
        }

        ticks = ticks.wrapping_add(1);
        if ticks % STATS_INTERVAL == 0 {
            let ingest = monitor.ingest_stats();
            let writes = monitor.write_stats();
            debug!(
                "Ingest: {} ok, {} bad, {} truncated; display: {} rows, {} skipped",
                ingest.accepted,
                ingest.rejected,
                ingest.truncated,
                writes.row_writes,
                writes.skipped
            );
        }
    }
}
