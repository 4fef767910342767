//! UART serial receive abstraction
//!
//! The monitor loop never blocks on serial input. Each iteration drains
//! whatever bytes have arrived since the previous one.

/// UART receiver
///
/// Non-blocking byte source for the telemetry stream.
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Copy already-received bytes into `buf`
    ///
    /// Returns the number of bytes written, `0` when nothing is pending.
    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}
