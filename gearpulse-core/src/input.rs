//! Touch gesture tracking
//!
//! The touch level is sampled once per loop iteration. A press starts on
//! the rising edge; its length on release decides between a tap and a
//! long press.

/// Completed touch gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Short touch
    Tap,
    /// Touch held at least the long-press threshold
    LongPress,
}

/// Edge tracker for the touch button
#[derive(Debug, Clone)]
pub struct TouchTracker {
    last_level: bool,
    pressed_at: u32,
    active: bool,
    long_press_ms: u32,
}

impl TouchTracker {
    pub fn new(long_press_ms: u32) -> Self {
        Self {
            last_level: false,
            pressed_at: 0,
            active: false,
            long_press_ms,
        }
    }

    /// Whether a press is in progress
    pub fn is_pressed(&self) -> bool {
        self.active
    }

    /// Feed one sample; `touched` is the level after polarity handling
    ///
    /// Returns the gesture completed by this sample, if any.
    pub fn sample(&mut self, touched: bool, now: u32) -> Option<Gesture> {
        let mut gesture = None;

        if touched && !self.last_level {
            self.pressed_at = now;
            self.active = true;
        } else if !touched && self.last_level && self.active {
            let held = now.wrapping_sub(self.pressed_at);
            gesture = Some(if held >= self.long_press_ms {
                Gesture::LongPress
            } else {
                Gesture::Tap
            });
            self.active = false;
        }

        self.last_level = touched;
        gesture
    }
}
