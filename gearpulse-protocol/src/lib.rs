//! GearPulse Telemetry Protocol
//!
//! One-way protocol from the host PC to the monitor. The host writes one
//! JSON record per line over a 115200 baud serial link:
//!
//! ```text
//! {"cpu":{"load":45.6,"temp":67.4},
//!  "gpu":{"load":12.0,"temp":50.0},
//!  "ram":{"total":32,"used":12.4,"usagePercent":38.7},
//!  "network":{"upload":2048,"download":3145728}}\n
//! ```
//!
//! (shown wrapped; on the wire the record is a single line terminated by
//! `\n` or `\r`).
//!
//! There is no acknowledgement, retransmission or checksum. A record that
//! fails to decode is dropped and the previous [`Snapshot`] stays current.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod line;
pub mod telemetry;

pub use line::{LineBuffer, LineStatus, LINE_CAPACITY, MIN_LINE_LEN};
pub use telemetry::{decode, DecodeError, ErrorCategory, Snapshot};
