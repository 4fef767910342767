//! Collaborator traits
//!
//! These traits define the interface between the monitor logic and the
//! board. The display trait lives in `gearpulse-display`.

pub mod random;

pub use gearpulse_display::CharDisplay;
pub use random::{RandomSource, RngSource};
