//! Inter-task communication channels
//!
//! The serial receive task forwards raw byte chunks; the control task
//! drains them once per tick through [`SerialChunks`].

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use gearpulse_hal::UartRx;

/// Largest chunk forwarded in one message
pub const CHUNK_SIZE: usize = 64;

/// Channel capacity in chunks
const SERIAL_CHANNEL_SIZE: usize = 16;

/// Bytes received from the host in one UART read
pub type Chunk = heapless::Vec<u8, CHUNK_SIZE>;

/// Telemetry bytes from the serial receive task
pub static SERIAL_RX: Channel<CriticalSectionRawMutex, Chunk, SERIAL_CHANNEL_SIZE> =
    Channel::new();

/// Non-blocking byte source over [`SERIAL_RX`]
///
/// A chunk that does not fit the caller's buffer is kept and finished on
/// the next read.
pub struct SerialChunks {
    receiver: Receiver<'static, CriticalSectionRawMutex, Chunk, SERIAL_CHANNEL_SIZE>,
    pending: Chunk,
    pos: usize,
}

impl SerialChunks {
    pub fn new() -> Self {
        Self {
            receiver: SERIAL_RX.receiver(),
            pending: Chunk::new(),
            pos: 0,
        }
    }
}

impl UartRx for SerialChunks {
    type Error = Infallible;

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        let mut written = 0;

        while written < buf.len() {
            if self.pos == self.pending.len() {
                match self.receiver.try_receive() {
                    Ok(chunk) => {
                        self.pending = chunk;
                        self.pos = 0;
                    }
                    Err(_) => break,
                }
            }

            let n = (self.pending.len() - self.pos).min(buf.len() - written);
            buf[written..written + n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
            written += n;
            self.pos += n;
        }

        Ok(written)
    }
}
