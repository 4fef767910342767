//! Host serial receive task
//!
//! Reads whatever the UART has buffered and forwards it to the control
//! task. Line framing and decoding happen there.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::{Chunk, CHUNK_SIZE, SERIAL_RX};

/// Serial RX task - forwards received bytes in chunks
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                let mut chunk = Chunk::new();
                // n never exceeds the chunk capacity
                let _ = chunk.extend_from_slice(&buf[..n]);
                SERIAL_RX.send(chunk).await;
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
