//! Touch sensor input
//!
//! Wraps an embassy-rp input so the monitor can sample it through the
//! shared [`InputPin`] trait.

use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;
use gearpulse_hal::{ActiveLevel, InputPin};

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// Touch sensor on a GPIO pin
pub struct TouchInput<'d> {
    input: Input<'d>,
    level: ActiveLevel,
}

impl<'d> TouchInput<'d> {
    /// Configure `pin` as the touch input
    ///
    /// The internal pull holds the line at its idle level so a
    /// disconnected sensor never reads as touched.
    pub fn new(pin: Peri<'d, AnyPin>, level: ActiveLevel) -> Self {
        Self {
            input: Input::new(pin, idle_pull(level)),
            level,
        }
    }

    /// Whether the sensor is currently touched
    pub fn is_touched(&self) -> bool {
        self.level.is_active(self)
    }
}

impl InputPin for TouchInput<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}

/// Pull that keeps an input at its inactive level
pub fn idle_pull(level: ActiveLevel) -> Pull {
    match level {
        ActiveLevel::High => Pull::Down,
        ActiveLevel::Low => Pull::Up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_pull() {
        assert!(matches!(idle_pull(ActiveLevel::High), Pull::Down));
        assert!(matches!(idle_pull(ActiveLevel::Low), Pull::Up));
    }
}
