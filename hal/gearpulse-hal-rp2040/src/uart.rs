//! UART configuration and pin-function table
//!
//! RP2040 has two UART peripherals (UART0 and UART1). The telemetry
//! stream only needs the receive side, but the pins still come as TX/RX
//! pairs.

use embassy_rp::uart::{Config, DataBits, Parity, StopBits};

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// 8N1 config at the given baud rate
pub fn config_8n1(baud_rate: u32) -> Config {
    let mut cfg = Config::default();
    cfg.baudrate = baud_rate;
    cfg.data_bits = DataBits::DataBits8;
    cfg.parity = Parity::ParityNone;
    cfg.stop_bits = StopBits::STOP1;
    cfg
}

/// Determine which UART a TX/RX pin pair belongs to
///
/// TX/RX sit on the first two pins of each group of four GPIOs. The
/// groups alternate UART0, UART1, UART1, UART0 and so on.
pub fn uart_for_pins(tx: u8, rx: u8) -> Option<UartId> {
    if tx >= 30 || tx % 4 != 0 || rx != tx + 1 {
        return None;
    }
    match (tx / 4 + 1) / 2 % 2 {
        0 => Some(UartId::Uart0),
        _ => Some(UartId::Uart1),
    }
}
