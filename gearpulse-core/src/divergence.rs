//! Divergence meter
//!
//! A decorative meter that alternates between two phases:
//!
//! ```text
//!   Holding ──hold_ms──▶ Animating ──animation_ms──▶ Holding ...
//! ```
//!
//! Entering `Animating` draws a new target value. While animating, digits
//! of the target settle left to right over scrambled noise. Entering
//! `Holding` snaps the current value to the target and shows the worldline
//! it belongs to.

use core::fmt::Write;

use gearpulse_display::{Row, COLS, ROWS};
use heapless::String;

use crate::config::DivergenceConfig;
use crate::traits::RandomSource;

/// Values closer than this are considered equal
const EPSILON: f32 = 0.000_001;

/// The Steins;Gate worldline value
pub const STEINS_GATE: f32 = 1.048_596;

/// Redraws allowed when the new target equals the current value
const MAX_REDRAWS: usize = 16;

/// Title shown while animating
const TITLE: &str = "DIVERGENCE";

/// Meter phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Digits settling towards the target
    Animating,
    /// Settled value shown with its worldline
    Holding,
}

/// Named range a divergence value falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Worldline {
    SteinsGate,
    Alpha,
    Beta,
    /// Near 1.0 but not the exact Steins;Gate value
    SteinsGateRange,
    Gamma,
    Delta,
    Unknown,
}

impl Worldline {
    /// Classify a divergence value
    pub fn classify(value: f32) -> Self {
        if libm::fabsf(value - STEINS_GATE) < EPSILON {
            Worldline::SteinsGate
        } else if value < 0.5 {
            Worldline::Alpha
        } else if value < 1.0 {
            Worldline::Beta
        } else if value < 1.1 {
            Worldline::SteinsGateRange
        } else if value < 2.0 {
            Worldline::Gamma
        } else if value < 3.0 {
            Worldline::Delta
        } else {
            Worldline::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Worldline::SteinsGate => "STEINS;GATE",
            Worldline::Alpha => "ALPHA WORLDLINE",
            Worldline::Beta => "BETA WORLDLINE",
            Worldline::SteinsGateRange => "STEINS GATE",
            Worldline::Gamma => "GAMMA WORLDLINE",
            Worldline::Delta => "DELTA WORLDLINE",
            Worldline::Unknown => "UNKNOWN WORLDLINE",
        }
    }

    /// Label as laid out on the top row while holding
    pub fn banner(self) -> &'static str {
        match self {
            Worldline::SteinsGate => "  STEINS;GATE   ",
            Worldline::Alpha => " ALPHA WORLDLINE",
            Worldline::Beta => " BETA WORLDLINE ",
            Worldline::SteinsGateRange => "  STEINS GATE   ",
            Worldline::Gamma => " GAMMA WORLDLINE",
            Worldline::Delta => " DELTA WORLDLINE",
            Worldline::Unknown => "UNKNOWN WORLDLIN",
        }
    }
}

/// Draw a target value
///
/// Canonical values come up 70% of the time; the rest is uniform in
/// `[0, 3)` at 1e-5 resolution.
pub fn sample_target<R: RandomSource + ?Sized>(rng: &mut R) -> f32 {
    match rng.below(100) {
        0..=24 => STEINS_GATE,
        25..=39 => 0.0,
        40..=54 => 0.571_024,
        55..=69 => 1.130_426,
        _ => rng.below(300_000) as f32 / 100_000.0,
    }
}

/// Value with six decimals, as shown on the display
pub fn format_value(value: f32) -> String<COLS> {
    let mut out = String::new();
    let _ = write!(out, "{:.6}", value);
    out
}

/// Divergence meter state
#[derive(Debug, Clone)]
pub struct DivergenceMeter {
    phase: Phase,
    current: f32,
    target: f32,
    entered_at: u32,
    last_frame: Option<u32>,
    screen: [Row; ROWS],
    timing: DivergenceConfig,
}

impl DivergenceMeter {
    /// Start holding a freshly drawn value
    pub fn new<R: RandomSource + ?Sized>(timing: DivergenceConfig, rng: &mut R, now: u32) -> Self {
        let value = sample_target(rng);
        Self {
            phase: Phase::Holding,
            current: value,
            target: value,
            entered_at: now,
            last_frame: None,
            screen: hold_screen(value),
            timing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Value last settled on
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Value being animated towards
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Rows the meter currently shows
    pub fn screen(&self) -> &[Row; ROWS] {
        &self.screen
    }

    /// Return to `Holding` on the current value, restarting the hold timer
    pub fn reset_hold(&mut self, now: u32) {
        self.phase = Phase::Holding;
        self.entered_at = now;
        self.last_frame = None;
        self.screen = hold_screen(self.current);
    }

    /// Advance the meter
    ///
    /// Returns `true` when the screen changed.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, now: u32, rng: &mut R) -> bool {
        let elapsed = now.wrapping_sub(self.entered_at);

        match self.phase {
            Phase::Holding => {
                if elapsed < self.timing.hold_ms {
                    return false;
                }
                self.start_animation(now, rng);
                self.frame(now, rng);
                true
            }
            Phase::Animating => {
                // Completion first, so the final screen is the hold screen
                if elapsed >= self.timing.animation_ms {
                    self.settle(now);
                    return true;
                }

                let due = self
                    .last_frame
                    .map_or(true, |t| now.wrapping_sub(t) >= self.timing.frame_ms);
                if !due {
                    return false;
                }
                self.frame(now, rng);
                true
            }
        }
    }

    fn start_animation<R: RandomSource + ?Sized>(&mut self, now: u32, rng: &mut R) {
        let mut target = sample_target(rng);
        for _ in 0..MAX_REDRAWS {
            if libm::fabsf(target - self.current) >= EPSILON {
                break;
            }
            target = sample_target(rng);
        }

        self.target = target;
        self.phase = Phase::Animating;
        self.entered_at = now;
        self.last_frame = None;
        info!("divergence: new target {}", target);
    }

    fn settle(&mut self, now: u32) {
        self.current = self.target;
        self.phase = Phase::Holding;
        self.entered_at = now;
        self.last_frame = None;
        self.screen = hold_screen(self.current);
        info!("divergence: settled on {}", self.current);
    }

    fn frame<R: RandomSource + ?Sized>(&mut self, now: u32, rng: &mut R) {
        let elapsed = now.wrapping_sub(self.entered_at);
        let progress = elapsed as f32 / self.timing.animation_ms.max(1) as f32;

        let target = format_value(self.target);
        let mut scrambled: String<COLS> = String::new();
        for (i, c) in target.chars().enumerate() {
            let shown = if c.is_ascii_digit() {
                let digit_progress = progress * 2.0 - 0.15 * i as f32;
                let revealed = digit_progress > 0.9
                    || (rng.below(100) as f32) < digit_progress * 100.0;
                if revealed {
                    c
                } else {
                    random_digit(rng)
                }
            } else {
                c
            };
            let _ = scrambled.push(shown);
        }

        self.screen = [Row::centered(TITLE), Row::centered(&scrambled)];
        self.last_frame = Some(now);
    }
}

fn random_digit<R: RandomSource + ?Sized>(rng: &mut R) -> char {
    char::from_digit(rng.below(10), 10).unwrap_or('0')
}

/// Worldline label over the value
fn hold_screen(value: f32) -> [Row; ROWS] {
    [
        Row::from_text(Worldline::classify(value).banner()),
        Row::centered(&format_value(value)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RngSource;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::string::ToString;
    use std::vec::Vec;

    /// Replays fixed values, then repeats the last one
    struct Scripted {
        values: Vec<u32>,
        pos: usize,
    }

    impl Scripted {
        fn new(values: &[u32]) -> Self {
            Self {
                values: values.to_vec(),
                pos: 0,
            }
        }
    }

    impl RandomSource for Scripted {
        fn below(&mut self, bound: u32) -> u32 {
            let v = self.values[self.pos.min(self.values.len() - 1)];
            self.pos += 1;
            v % bound.max(1)
        }
    }

    fn timing() -> DivergenceConfig {
        DivergenceConfig::default()
    }

    fn text(row: &Row) -> std::string::String {
        row.to_string()
    }

    #[test]
    fn test_labels() {
        assert_eq!(Worldline::classify(1.048_596).label(), "STEINS;GATE");
        assert_eq!(Worldline::classify(0.3).label(), "ALPHA WORLDLINE");
        assert_eq!(Worldline::classify(0.571_024), Worldline::Beta);
        assert_eq!(Worldline::classify(1.05), Worldline::SteinsGateRange);
        assert_eq!(Worldline::classify(1.130_426), Worldline::Gamma);
        assert_eq!(Worldline::classify(2.5).label(), "DELTA WORLDLINE");
        assert_eq!(Worldline::classify(5.0).label(), "UNKNOWN WORLDLINE");
    }

    #[test]
    fn test_banners_fill_the_row() {
        assert_eq!(Worldline::Alpha.banner(), " ALPHA WORLDLINE");
        assert_eq!(Worldline::Gamma.banner(), " GAMMA WORLDLINE");
        assert_eq!(Worldline::Beta.banner(), " BETA WORLDLINE ");
        assert_eq!(Worldline::SteinsGate.banner(), "  STEINS;GATE   ");
        for w in [
            Worldline::SteinsGate,
            Worldline::Alpha,
            Worldline::Beta,
            Worldline::SteinsGateRange,
            Worldline::Gamma,
            Worldline::Delta,
            Worldline::Unknown,
        ] {
            assert_eq!(w.banner().chars().count(), COLS);
        }
        assert_eq!(text(&hold_screen(0.3)[0]), " ALPHA WORLDLINE");
        assert_eq!(text(&hold_screen(2.5)[0]), " DELTA WORLDLINE");
    }

    #[test]
    fn test_sample_target_buckets() {
        assert_eq!(sample_target(&mut Scripted::new(&[0])), STEINS_GATE);
        assert_eq!(sample_target(&mut Scripted::new(&[24])), STEINS_GATE);
        assert_eq!(sample_target(&mut Scripted::new(&[25])), 0.0);
        assert_eq!(sample_target(&mut Scripted::new(&[54])), 0.571_024);
        assert_eq!(sample_target(&mut Scripted::new(&[69])), 1.130_426);
        assert_eq!(
            sample_target(&mut Scripted::new(&[70, 150_000])),
            1.5
        );
    }

    #[test]
    fn test_uniform_targets_below_three() {
        let mut rng = RngSource::new(SmallRng::seed_from_u64(3));
        for _ in 0..500 {
            let v = sample_target(&mut rng);
            assert!((0.0..3.0).contains(&v));
        }
    }

    #[test]
    fn test_hold_screen() {
        let meter = DivergenceMeter::new(timing(), &mut Scripted::new(&[0]), 0);
        assert_eq!(meter.phase(), Phase::Holding);
        assert_eq!(text(&meter.screen()[0]), "  STEINS;GATE   ");
        assert_eq!(text(&meter.screen()[1]), "    1.048596");
    }

    #[test]
    fn test_unknown_label_truncated() {
        let [top, _] = hold_screen(5.0);
        assert_eq!(text(&top), "UNKNOWN WORLDLIN");
    }

    #[test]
    fn test_holds_then_animates() {
        // Seed 1.048596, then the next target is Beta
        let mut rng = Scripted::new(&[0, 40, 99]);
        let mut meter = DivergenceMeter::new(timing(), &mut rng, 0);

        assert!(!meter.tick(59_999, &mut rng));
        assert_eq!(meter.phase(), Phase::Holding);

        assert!(meter.tick(60_000, &mut rng));
        assert_eq!(meter.phase(), Phase::Animating);
        assert_eq!(meter.target(), 0.571_024);
        assert_eq!(meter.current(), STEINS_GATE);
        assert_eq!(text(&meter.screen()[0]), "   DIVERGENCE");
    }

    #[test]
    fn test_redraws_equal_target() {
        // 0 and 10 both draw Steins;Gate, 30 draws Alpha
        let mut rng = Scripted::new(&[0, 0, 10, 30, 99]);
        let mut meter = DivergenceMeter::new(timing(), &mut rng, 0);
        meter.tick(60_000, &mut rng);
        assert_eq!(meter.target(), 0.0);
    }

    #[test]
    fn test_frames_are_throttled() {
        let mut rng = RngSource::new(SmallRng::seed_from_u64(11));
        let mut meter = DivergenceMeter::new(timing(), &mut rng, 0);
        assert!(meter.tick(60_000, &mut rng));

        assert!(!meter.tick(60_010, &mut rng));
        assert!(!meter.tick(60_039, &mut rng));
        assert!(meter.tick(60_040, &mut rng));
        assert!(!meter.tick(60_050, &mut rng));
        assert!(meter.tick(60_080, &mut rng));
    }

    #[test]
    fn test_animation_settles_on_target() {
        let mut rng = RngSource::new(SmallRng::seed_from_u64(5));
        let mut meter = DivergenceMeter::new(timing(), &mut rng, 1000);
        meter.tick(61_000, &mut rng);
        let target = meter.target();

        let mut now = 61_000;
        while meter.phase() == Phase::Animating {
            now += 10;
            meter.tick(now, &mut rng);
        }

        assert_eq!(now, 76_000);
        assert_eq!(meter.current(), target);
        assert_eq!(meter.screen(), &hold_screen(target));
    }

    #[test]
    fn test_late_frames_reveal_target() {
        // At 98% even the last digit is past the fixed threshold
        let mut rng = Scripted::new(&[0, 40, 99]);
        let mut meter = DivergenceMeter::new(timing(), &mut rng, 0);
        meter.tick(60_000, &mut rng);
        meter.tick(60_000 + 14_700, &mut rng);
        assert_eq!(text(&meter.screen()[1]), "    0.571024");
    }

    #[test]
    fn test_early_frame_keeps_layout() {
        // Reveal draws of 99 never pass at progress 0, noise digits are 7
        let mut rng = Scripted::new(&[0, 40, 99, 7, 99, 7, 99, 7, 99, 7, 99, 7, 99, 7, 99, 7]);
        let mut meter = DivergenceMeter::new(timing(), &mut rng, 0);
        meter.tick(60_000, &mut rng);
        assert_eq!(text(&meter.screen()[1]), "    7.777777");
    }

    #[test]
    fn test_reset_hold() {
        let mut rng = Scripted::new(&[0, 40, 99]);
        let mut meter = DivergenceMeter::new(timing(), &mut rng, 0);
        meter.tick(60_000, &mut rng);

        meter.reset_hold(61_000);
        assert_eq!(meter.phase(), Phase::Holding);
        assert_eq!(meter.screen(), &hold_screen(STEINS_GATE));
        assert!(!meter.tick(120_999, &mut rng));
        assert!(meter.tick(121_000, &mut rng));
    }

    #[test]
    fn test_timestamp_wraparound() {
        let mut rng = Scripted::new(&[0, 40, 99]);
        let start = u32::MAX - 100;
        let mut meter = DivergenceMeter::new(timing(), &mut rng, start);
        assert!(!meter.tick(start.wrapping_add(59_999), &mut rng));
        assert!(meter.tick(start.wrapping_add(60_000), &mut rng));
    }
}
