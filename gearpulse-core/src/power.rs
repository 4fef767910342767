//! Power state and timed power sequences
//!
//! Power-on walks through three messages before the first view is shown;
//! power-off shows one message before the backlight goes dark. Each stage
//! lasts a configured time and the loop advances the sequence on every
//! poll instead of blocking.

use crate::config::PowerConfig;

/// Whether the monitor is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    On,
    Off,
}

/// One step of a power sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Splash,
    Starting,
    Ready,
    ShuttingDown,
}

impl Stage {
    /// Message shown during this stage
    pub fn message(self) -> (&'static str, Option<&'static str>) {
        match self {
            Stage::Splash => ("GearPulse", None),
            Stage::Starting => ("System Monitor", Some("Starting...")),
            Stage::Ready => ("System Ready", Some("Waiting for data")),
            Stage::ShuttingDown => ("Powering Off...", None),
        }
    }

    pub fn duration(self, timing: &PowerConfig) -> u32 {
        match self {
            Stage::Splash => timing.splash_ms,
            Stage::Starting => timing.starting_ms,
            Stage::Ready => timing.ready_ms,
            Stage::ShuttingDown => timing.shutdown_ms,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Stage::Splash => Some(Stage::Starting),
            Stage::Starting => Some(Stage::Ready),
            Stage::Ready | Stage::ShuttingDown => None,
        }
    }
}

/// Outcome of advancing a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Current stage still running
    Wait,
    /// A new stage started; show its message
    Enter(Stage),
    /// The sequence is over
    Done,
}

/// A running power sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerSequence {
    stage: Stage,
    entered_at: u32,
}

impl PowerSequence {
    /// Start the power-on sequence
    pub fn power_on(now: u32) -> Self {
        Self {
            stage: Stage::Splash,
            entered_at: now,
        }
    }

    /// Start the power-off sequence
    pub fn power_off(now: u32) -> Self {
        Self {
            stage: Stage::ShuttingDown,
            entered_at: now,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether this sequence ends with the monitor on
    pub fn is_power_on(&self) -> bool {
        self.stage != Stage::ShuttingDown
    }

    /// Move to the next stage once the current one has run its time
    pub fn advance(&mut self, now: u32, timing: &PowerConfig) -> Step {
        if now.wrapping_sub(self.entered_at) < self.stage.duration(timing) {
            return Step::Wait;
        }

        match self.stage.next() {
            Some(stage) => {
                self.stage = stage;
                self.entered_at = now;
                Step::Enter(stage)
            }
            None => Step::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_timeline() {
        let timing = PowerConfig::default();
        let mut seq = PowerSequence::power_on(1000);
        assert!(seq.is_power_on());

        assert_eq!(seq.advance(1599, &timing), Step::Wait);
        assert_eq!(seq.advance(1600, &timing), Step::Enter(Stage::Starting));
        assert_eq!(seq.advance(2599, &timing), Step::Wait);
        assert_eq!(seq.advance(2600, &timing), Step::Enter(Stage::Ready));
        assert_eq!(seq.advance(3599, &timing), Step::Wait);
        assert_eq!(seq.advance(3600, &timing), Step::Done);
    }

    #[test]
    fn test_power_off_timeline() {
        let timing = PowerConfig::default();
        let mut seq = PowerSequence::power_off(0);
        assert!(!seq.is_power_on());
        assert_eq!(seq.stage().message(), ("Powering Off...", None));
        assert_eq!(seq.advance(999, &timing), Step::Wait);
        assert_eq!(seq.advance(1000, &timing), Step::Done);
    }

    #[test]
    fn test_zero_durations_step_every_poll() {
        let timing = PowerConfig {
            splash_ms: 0,
            starting_ms: 0,
            ready_ms: 0,
            shutdown_ms: 0,
        };
        let mut seq = PowerSequence::power_on(0);
        assert_eq!(seq.advance(0, &timing), Step::Enter(Stage::Starting));
        assert_eq!(seq.advance(0, &timing), Step::Enter(Stage::Ready));
        assert_eq!(seq.advance(0, &timing), Step::Done);
    }
}
