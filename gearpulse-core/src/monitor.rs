//! Monitor control loop
//!
//! [`Monitor`] owns every piece of mutable state: power, view mode,
//! the latest snapshot, the line buffer, the row cache, the touch tracker
//! and the divergence meter. The board calls [`Monitor::poll`] at a fixed
//! interval with the current time, the touch level and whatever serial
//! bytes arrived since the previous call.
//!
//! Each poll runs, in order:
//!
//! 1. the running power sequence, if any
//! 2. telemetry ingestion (discarded while off)
//! 3. the divergence meter
//! 4. touch gesture handling

use gearpulse_display::{CharDisplay, DisplayError, RowCache, WriteStats};
use gearpulse_protocol::{decode, LineBuffer, LineStatus, Snapshot};

use crate::config::{Config, DivergenceConfig, PowerConfig};
use crate::divergence::DivergenceMeter;
use crate::input::{Gesture, TouchTracker};
use crate::power::{PowerSequence, PowerState, Stage, Step};
use crate::traits::RandomSource;
use crate::view::{self, Line, ViewMode};

/// Telemetry ingestion counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IngestStats {
    /// Records decoded into a new snapshot
    pub accepted: u32,
    /// Records that failed to decode
    pub rejected: u32,
    /// Terminators with too little content to be a record
    pub noise: u32,
    /// Lines that overflowed the buffer
    pub truncated: u32,
}

/// The hardware monitor
pub struct Monitor<D, R> {
    display: D,
    rng: R,
    divergence_config: DivergenceConfig,
    power_timing: PowerConfig,

    power: PowerState,
    sequence: Option<PowerSequence>,
    /// The current stage message made it to the display
    stage_shown: bool,
    mode: ViewMode,
    snapshot: Snapshot,

    line: LineBuffer,
    cache: RowCache,
    touch: TouchTracker,
    meter: Option<DivergenceMeter>,
    stats: IngestStats,
}

impl<D: CharDisplay, R: RandomSource> Monitor<D, R> {
    /// Create a powered-off monitor
    ///
    /// The display must already be initialized with its glyphs loaded.
    /// Call [`Monitor::start`] to run the power-on sequence.
    pub fn new(display: D, mut rng: R, config: &Config, now: u32) -> Self {
        let meter = config
            .divergence
            .enabled
            .then(|| DivergenceMeter::new(config.divergence, &mut rng, now));

        Self {
            display,
            rng,
            divergence_config: config.divergence,
            power_timing: config.power,
            power: PowerState::Off,
            sequence: None,
            stage_shown: false,
            mode: ViewMode::Cpu,
            snapshot: Snapshot::zeroed(),
            line: LineBuffer::new(),
            cache: RowCache::new(),
            touch: TouchTracker::new(config.touch.long_press_ms),
            meter,
            stats: IngestStats::default(),
        }
    }

    /// Begin the power-on sequence
    pub fn start(&mut self, now: u32) -> Result<(), DisplayError> {
        self.power_on(now)
    }

    /// Run one loop iteration
    ///
    /// Decode failures are logged and counted, never returned. A display
    /// error does not cut the iteration short: every byte is still fed
    /// and touch is still sampled, and the first error is returned.
    pub fn poll(&mut self, now: u32, touched: bool, bytes: &[u8]) -> Result<(), DisplayError> {
        let mut result = self.advance_sequence(now);
        result = result.and(self.ingest(bytes));
        result = result.and(self.step_divergence(now));

        if let Some(gesture) = self.touch.sample(touched, now) {
            result = result.and(self.on_gesture(gesture, now));
        }
        result
    }

    /// Re-initialize the display and redraw what it should be showing
    ///
    /// For a controller that missed its init at boot or lost power.
    pub fn reinit_display(&mut self) -> Result<(), DisplayError> {
        self.display.init()?;
        self.display.load_glyphs()?;
        self.cache.invalidate();
        self.stage_shown = false;

        match (self.sequence, self.power) {
            // Redrawn by the next poll
            (Some(_), _) => Ok(()),
            (None, PowerState::On) => {
                self.display.set_backlight(true)?;
                self.render()
            }
            (None, PowerState::Off) => self.display.set_backlight(false),
        }
    }

    pub fn power(&self) -> PowerState {
        self.power
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Latest accepted telemetry
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Stage of the running power sequence
    pub fn sequence_stage(&self) -> Option<Stage> {
        self.sequence.map(|s| s.stage())
    }

    pub fn divergence(&self) -> Option<&DivergenceMeter> {
        self.meter.as_ref()
    }

    pub fn ingest_stats(&self) -> IngestStats {
        self.stats
    }

    pub fn write_stats(&self) -> WriteStats {
        self.cache.stats()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn advance_sequence(&mut self, now: u32) -> Result<(), DisplayError> {
        let Some(seq) = self.sequence.as_mut() else {
            return Ok(());
        };
        let powering_on = seq.is_power_on();

        match seq.advance(now, &self.power_timing) {
            Step::Wait if self.stage_shown => Ok(()),
            Step::Wait => {
                let stage = seq.stage();
                self.show_stage(stage)
            }
            Step::Enter(stage) => self.show_stage(stage),
            Step::Done => {
                // The sequence stays until its last action lands, so a
                // failed write is retried on the next poll
                self.cache.invalidate();
                let finished = if powering_on {
                    self.display.set_backlight(true).and_then(|()| self.render())
                } else {
                    self.display.set_backlight(false)
                };
                if finished.is_ok() {
                    self.sequence = None;
                    info!("power {} complete", if powering_on { "on" } else { "off" });
                }
                finished
            }
        }
    }

    fn ingest(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        if self.power == PowerState::Off {
            self.line.reset();
            return Ok(());
        }

        let mut result = Ok(());
        for &byte in bytes {
            match self.line.feed(byte) {
                LineStatus::Pending => {}
                LineStatus::Noise => self.stats.noise = self.stats.noise.wrapping_add(1),
                LineStatus::Ready => result = result.and(self.accept_line()),
            }
        }
        result
    }

    fn accept_line(&mut self) -> Result<(), DisplayError> {
        let dropped = self.line.truncated();
        if dropped > 0 {
            self.stats.truncated = self.stats.truncated.wrapping_add(1);
            debug!("telemetry line truncated, {} bytes dropped", dropped);
        }

        let Some(line) = self.line.line() else {
            return Ok(());
        };

        match decode(line) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.stats.accepted = self.stats.accepted.wrapping_add(1);
                trace!("telemetry accepted");
                if self.mode != ViewMode::Divergence && self.sequence.is_none() {
                    self.render()?;
                }
            }
            Err(err) => {
                self.stats.rejected = self.stats.rejected.wrapping_add(1);
                warn!("telemetry rejected: {}", err);
            }
        }
        Ok(())
    }

    fn step_divergence(&mut self, now: u32) -> Result<(), DisplayError> {
        if self.power != PowerState::On {
            return Ok(());
        }

        let showing = self.mode == ViewMode::Divergence;
        if !showing && !self.divergence_config.run_hidden {
            return Ok(());
        }

        let Some(meter) = self.meter.as_mut() else {
            return Ok(());
        };

        let changed = meter.tick(now, &mut self.rng);
        if changed && showing && self.sequence.is_none() {
            self.render()?;
        }
        Ok(())
    }

    fn on_gesture(&mut self, gesture: Gesture, now: u32) -> Result<(), DisplayError> {
        if self.sequence.is_some() {
            debug!("gesture {} ignored during power sequence", gesture);
            return Ok(());
        }

        match (gesture, self.power) {
            (Gesture::LongPress, PowerState::On) => self.power_off(now),
            (Gesture::LongPress, PowerState::Off) => self.power_on(now),
            (Gesture::Tap, PowerState::On) => self.next_view(now),
            (Gesture::Tap, PowerState::Off) => Ok(()),
        }
    }

    fn next_view(&mut self, now: u32) -> Result<(), DisplayError> {
        self.mode = self.mode.next(self.meter.is_some());
        info!("view {}", self.mode);

        if self.mode == ViewMode::Divergence {
            if let Some(meter) = self.meter.as_mut() {
                meter.reset_hold(now);
            }
        }
        self.render()
    }

    fn power_on(&mut self, now: u32) -> Result<(), DisplayError> {
        info!("power on");
        self.power = PowerState::On;
        self.snapshot = Snapshot::zeroed();
        self.line.reset();

        let seq = PowerSequence::power_on(now);
        self.sequence = Some(seq);
        self.show_stage(seq.stage())
    }

    fn power_off(&mut self, now: u32) -> Result<(), DisplayError> {
        info!("power off");
        self.power = PowerState::Off;
        self.snapshot = Snapshot::zeroed();
        self.mode = ViewMode::Cpu;
        self.line.reset();
        if let Some(meter) = self.meter.as_mut() {
            meter.reset_hold(now);
        }

        let seq = PowerSequence::power_off(now);
        self.sequence = Some(seq);
        self.show_stage(seq.stage())
    }

    /// Light the backlight and show a stage message
    fn show_stage(&mut self, stage: Stage) -> Result<(), DisplayError> {
        self.stage_shown = false;
        let (line1, line2) = stage.message();
        self.display.set_backlight(true)?;
        self.cache.show_message(&mut self.display, line1, line2)?;
        self.stage_shown = true;
        Ok(())
    }

    /// Push the active view through the row cache
    fn render(&mut self) -> Result<(), DisplayError> {
        let lines = view::render(self.mode, &self.snapshot, self.meter.as_ref());
        for (row, line) in lines.iter().enumerate() {
            match line {
                Line::Text(content) => self.cache.update_row(&mut self.display, row, content)?,
                Line::Bar(content) => self.cache.update_bar(&mut self.display, row, content)?,
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divergence::Phase;
    use crate::traits::RngSource;
    use gearpulse_display::{Cell, Glyph, COLS, ROWS};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::string::String;

    const RECORD: &[u8] = b"{\"cpu\":{\"load\":45.6,\"temp\":67.4},\"gpu\":{\"load\":12.0,\"temp\":50.0},\"ram\":{\"total\":32,\"used\":12.4,\"usagePercent\":50},\"network\":{\"upload\":2048,\"download\":3145728}}\n";

    const HOT_RECORD: &[u8] = b"{\"cpu\":{\"load\":99.0,\"temp\":70.0}}\n";

    /// Character grid that counts writes
    struct MockDisplay {
        screen: [[Cell; COLS]; ROWS],
        cursor: (usize, usize),
        backlight: bool,
        cell_writes: usize,
        initialized: bool,
        fail_writes: bool,
        fail_backlight: bool,
    }

    impl MockDisplay {
        fn new() -> Self {
            Self {
                screen: [[Cell::SPACE; COLS]; ROWS],
                cursor: (0, 0),
                backlight: false,
                cell_writes: 0,
                initialized: true,
                fail_writes: false,
                fail_backlight: false,
            }
        }

        fn check(&self) -> Result<(), DisplayError> {
            if !self.initialized {
                Err(DisplayError::NotInitialized)
            } else if self.fail_writes {
                Err(DisplayError::Communication)
            } else {
                Ok(())
            }
        }

        fn text(&self, row: usize) -> String {
            let s: String = self.screen[row].iter().map(|c| c.as_char()).collect();
            s.trim_end().into()
        }
    }

    impl CharDisplay for MockDisplay {
        fn init(&mut self) -> Result<(), DisplayError> {
            self.initialized = true;
            self.backlight = false;
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            self.check()?;
            self.screen = [[Cell::SPACE; COLS]; ROWS];
            self.cursor = (0, 0);
            Ok(())
        }

        fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
            self.check()?;
            self.cursor = (col as usize, row as usize);
            Ok(())
        }

        fn write_cell(&mut self, cell: Cell) -> Result<(), DisplayError> {
            self.check()?;
            let (col, row) = self.cursor;
            if col < COLS && row < ROWS {
                self.screen[row][col] = cell;
            }
            self.cursor.0 += 1;
            self.cell_writes += 1;
            Ok(())
        }

        fn load_glyph(&mut self, _slot: u8, _bitmap: &[u8; 8]) -> Result<(), DisplayError> {
            Ok(())
        }

        fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
            self.check()?;
            if self.fail_backlight {
                return Err(DisplayError::Communication);
            }
            self.backlight = on;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (COLS as u8, ROWS as u8)
        }
    }

    type TestMonitor = Monitor<MockDisplay, RngSource<SmallRng>>;

    fn monitor(config: &Config) -> TestMonitor {
        let rng = RngSource::new(SmallRng::seed_from_u64(0x47_50));
        Monitor::new(MockDisplay::new(), rng, config, 0)
    }

    /// Power on at t=0 and run the sequence to completion (t=2600)
    fn booted(config: &Config) -> TestMonitor {
        let mut m = monitor(config);
        m.start(0).unwrap();
        for t in [600, 1600, 2600] {
            m.poll(t, false, &[]).unwrap();
        }
        assert_eq!(m.sequence_stage(), None);
        m
    }

    /// Touch for `held` ms starting at `at`
    fn press(m: &mut TestMonitor, at: u32, held: u32) {
        m.poll(at, true, &[]).unwrap();
        m.poll(at + held, false, &[]).unwrap();
    }

    fn rows(m: &TestMonitor) -> (String, String) {
        (m.display().text(0), m.display().text(1))
    }

    #[test]
    fn test_power_on_sequence() {
        let mut m = monitor(&Config::default());
        assert_eq!(m.power(), PowerState::Off);

        m.start(0).unwrap();
        assert!(m.display().backlight);
        assert_eq!(m.power(), PowerState::On);
        assert_eq!(rows(&m), ("GearPulse".into(), "".into()));

        m.poll(599, false, &[]).unwrap();
        assert_eq!(m.sequence_stage(), Some(Stage::Splash));
        m.poll(600, false, &[]).unwrap();
        assert_eq!(rows(&m), ("System Monitor".into(), "Starting...".into()));
        m.poll(1600, false, &[]).unwrap();
        assert_eq!(rows(&m), ("System Ready".into(), "Waiting for data".into()));
        m.poll(2600, false, &[]).unwrap();
        assert_eq!(rows(&m), ("CPU:  0°C 0.0%".into(), "GPU:  0°C 0.0%".into()));
    }

    #[test]
    fn test_record_renders_cpu_view() {
        let mut m = booted(&Config::default());
        m.poll(3000, false, RECORD).unwrap();

        assert_eq!(m.snapshot().cpu_load, 45.6);
        assert_eq!(m.ingest_stats().accepted, 1);
        assert_eq!(
            rows(&m),
            ("CPU:  67°C 45.6%".into(), "GPU:  50°C 12.0%".into())
        );
    }

    #[test]
    fn test_same_record_twice_writes_nothing() {
        let mut m = booted(&Config::default());
        m.poll(3000, false, RECORD).unwrap();
        let writes = m.display().cell_writes;
        let row_writes = m.write_stats().row_writes;

        m.poll(4000, false, RECORD).unwrap();
        assert_eq!(m.display().cell_writes, writes);
        assert_eq!(m.write_stats().row_writes, row_writes);
        assert_eq!(m.ingest_stats().accepted, 2);
    }

    #[test]
    fn test_record_split_across_polls() {
        let mut m = booted(&Config::default());
        let (head, tail) = RECORD.split_at(40);
        m.poll(3000, false, head).unwrap();
        assert_eq!(m.ingest_stats().accepted, 0);
        m.poll(3010, false, tail).unwrap();
        assert_eq!(m.snapshot().gpu_temp, 50.0);
    }

    #[test]
    fn test_malformed_record_keeps_snapshot() {
        let mut m = booted(&Config::default());
        m.poll(3000, false, RECORD).unwrap();
        let before = *m.snapshot();

        assert!(m.poll(3010, false, b"{bad\n").is_ok());
        assert_eq!(*m.snapshot(), before);
        assert_eq!(m.ingest_stats().rejected, 1);
    }

    #[test]
    fn test_crlf_counts_noise() {
        let mut m = booted(&Config::default());
        m.poll(3000, false, b"{}\r\n").unwrap();
        assert_eq!(m.ingest_stats().accepted, 1);
        assert_eq!(m.ingest_stats().noise, 1);
    }

    #[test]
    fn test_oversized_record_rejected() {
        let mut m = booted(&Config::default());
        let mut long = std::vec![b' '; 1100];
        long[0] = b'{';
        long.push(b'}');
        long.push(b'\n');

        m.poll(3000, false, &long).unwrap();
        assert_eq!(m.ingest_stats().truncated, 1);
        assert_eq!(m.ingest_stats().rejected, 1);
    }

    #[test]
    fn test_taps_cycle_views() {
        let mut m = booted(&Config::default());
        m.poll(3000, false, RECORD).unwrap();

        press(&mut m, 4000, 100);
        assert_eq!(m.mode(), ViewMode::Memory);
        assert_eq!(m.display().text(0), "RAM: 12/32GB 50%");
        assert_eq!(m.display().screen[1][7], Cell::Glyph(Glyph::BarFull));
        assert_eq!(m.display().screen[1][8], Cell::Glyph(Glyph::BarEmpty));

        press(&mut m, 5000, 100);
        assert_eq!(m.mode(), ViewMode::Network);
        assert_eq!(rows(&m), ("NET:".into(), "↓:3.0M ↑:2K".into()));

        press(&mut m, 6000, 100);
        assert_eq!(m.mode(), ViewMode::Divergence);
        let meter = m.divergence().unwrap();
        assert_eq!(meter.phase(), Phase::Holding);
        assert_eq!(m.display().text(1).trim_start().len(), 8);

        press(&mut m, 7000, 100);
        assert_eq!(m.mode(), ViewMode::Cpu);
        assert_eq!(m.display().text(0), "CPU:  67°C 45.6%");
    }

    #[test]
    fn test_divergence_disabled_skips_view() {
        let mut config = Config::default();
        config.divergence.enabled = false;
        let mut m = booted(&config);
        assert!(m.divergence().is_none());

        for (i, expected) in [ViewMode::Memory, ViewMode::Network, ViewMode::Cpu]
            .into_iter()
            .enumerate()
        {
            press(&mut m, 3000 + i as u32 * 1000, 100);
            assert_eq!(m.mode(), expected);
        }
    }

    #[test]
    fn test_long_press_threshold() {
        let mut m = booted(&Config::default());

        press(&mut m, 3000, 1999);
        assert_eq!(m.power(), PowerState::On);
        assert_eq!(m.mode(), ViewMode::Memory);

        press(&mut m, 6000, 2000);
        assert_eq!(m.power(), PowerState::Off);
        assert_eq!(m.mode(), ViewMode::Cpu);
        assert_eq!(m.display().text(0), "Powering Off...");
        assert!(m.display().backlight);

        m.poll(8999, false, &[]).unwrap();
        assert!(m.display().backlight);
        m.poll(9000, false, &[]).unwrap();
        assert!(!m.display().backlight);
        assert_eq!(m.sequence_stage(), None);
    }

    #[test]
    fn test_off_discards_telemetry_and_taps() {
        let mut m = booted(&Config::default());
        m.poll(3000, false, RECORD).unwrap();
        press(&mut m, 4000, 2500);
        m.poll(8000, false, &[]).unwrap();
        assert_eq!(m.power(), PowerState::Off);
        assert_eq!(*m.snapshot(), Snapshot::zeroed());

        m.poll(9000, false, RECORD).unwrap();
        assert_eq!(*m.snapshot(), Snapshot::zeroed());
        assert_eq!(m.ingest_stats().accepted, 1);

        // Half a record while off must not join the next one
        m.poll(9100, false, &RECORD[..30]).unwrap();
        press(&mut m, 10_000, 100);
        assert_eq!(m.mode(), ViewMode::Cpu);
        assert_eq!(m.power(), PowerState::Off);

        press(&mut m, 11_000, 2000);
        assert_eq!(m.power(), PowerState::On);
        assert_eq!(m.sequence_stage(), Some(Stage::Splash));
        m.poll(13_100, false, RECORD).unwrap();
        assert_eq!(m.ingest_stats().rejected, 0);
        assert_eq!(m.ingest_stats().accepted, 2);
    }

    #[test]
    fn test_gestures_ignored_during_sequence() {
        let mut m = monitor(&Config::default());
        m.start(0).unwrap();

        press(&mut m, 100, 100);
        assert_eq!(m.mode(), ViewMode::Cpu);
        press(&mut m, 300, 2000);
        assert_eq!(m.power(), PowerState::On);
    }

    #[test]
    fn test_telemetry_during_power_on_shown_after() {
        let mut m = monitor(&Config::default());
        m.start(0).unwrap();
        m.poll(700, false, RECORD).unwrap();

        assert_eq!(m.snapshot().cpu_temp, 67.4);
        assert_eq!(m.display().text(0), "System Monitor");

        m.poll(1700, false, &[]).unwrap();
        assert_eq!(m.sequence_stage(), Some(Stage::Ready));
        m.poll(2700, false, &[]).unwrap();
        assert_eq!(m.display().text(0), "CPU:  67°C 45.6%");
    }

    #[test]
    fn test_divergence_view_animates() {
        let mut m = booted(&Config::default());
        for t in [3000, 4000, 5000] {
            press(&mut m, t, 100);
        }
        assert_eq!(m.mode(), ViewMode::Divergence);

        // Hold restarted when the view was entered at t=5100
        m.poll(65_099, false, &[]).unwrap();
        assert_eq!(m.divergence().unwrap().phase(), Phase::Holding);
        m.poll(65_100, false, &[]).unwrap();
        assert_eq!(m.divergence().unwrap().phase(), Phase::Animating);
        assert_eq!(m.display().text(0), "   DIVERGENCE");

        // Telemetry does not disturb the meter
        m.poll(65_110, false, RECORD).unwrap();
        assert_eq!(m.display().text(0), "   DIVERGENCE");

        m.poll(80_100, false, &[]).unwrap();
        let meter = m.divergence().unwrap();
        assert_eq!(meter.phase(), Phase::Holding);
        assert_eq!(m.display().text(0), meter.screen()[0].to_string().trim_end());
    }

    #[test]
    fn test_hidden_meter_keeps_running_without_drawing() {
        let mut m = booted(&Config::default());
        m.poll(3000, false, RECORD).unwrap();
        let writes = m.display().cell_writes;

        m.poll(60_000, false, &[]).unwrap();
        assert_eq!(m.divergence().unwrap().phase(), Phase::Animating);
        assert_eq!(m.display().cell_writes, writes);
        assert_eq!(m.display().text(0), "CPU:  67°C 45.6%");
    }

    #[test]
    fn test_hidden_meter_frozen_when_configured() {
        let mut config = Config::default();
        config.divergence.run_hidden = false;
        let mut m = booted(&config);

        m.poll(120_000, false, &[]).unwrap();
        assert_eq!(m.divergence().unwrap().phase(), Phase::Holding);
    }

    #[test]
    fn test_failed_render_keeps_decoding_the_chunk() {
        let mut m = booted(&Config::default());
        m.display_mut().fail_writes = true;

        let mut chunk = RECORD.to_vec();
        chunk.extend_from_slice(HOT_RECORD);
        assert_eq!(
            m.poll(3000, false, &chunk),
            Err(DisplayError::Communication)
        );
        assert_eq!(m.ingest_stats().accepted, 2);
        assert_eq!(m.snapshot().cpu_load, 99.0);

        m.display_mut().fail_writes = false;
        m.poll(3010, false, HOT_RECORD).unwrap();
        assert_eq!(m.display().text(0), "CPU:  70°C 99.0%");
    }

    #[test]
    fn test_touch_sampled_when_display_fails() {
        let mut m = booted(&Config::default());
        m.poll(4000, true, &[]).unwrap();

        m.display_mut().fail_writes = true;
        assert!(m.poll(4100, false, RECORD).is_err());
        assert_eq!(m.mode(), ViewMode::Memory);
        assert_eq!(m.snapshot().cpu_load, 45.6);
    }

    #[test]
    fn test_backlight_off_retried_until_it_lands() {
        let mut m = booted(&Config::default());
        press(&mut m, 3000, 2000);
        assert_eq!(m.power(), PowerState::Off);

        m.display_mut().fail_backlight = true;
        assert_eq!(m.poll(6000, false, &[]), Err(DisplayError::Communication));
        assert_eq!(m.sequence_stage(), Some(Stage::ShuttingDown));
        assert!(m.display().backlight);

        m.display_mut().fail_backlight = false;
        m.poll(6010, false, &[]).unwrap();
        assert!(!m.display().backlight);
        assert_eq!(m.sequence_stage(), None);
    }

    #[test]
    fn test_first_view_retried_after_failed_render() {
        let mut m = monitor(&Config::default());
        m.start(0).unwrap();
        m.poll(600, false, &[]).unwrap();
        m.poll(1600, false, RECORD).unwrap();

        m.display_mut().fail_writes = true;
        assert!(m.poll(2600, false, &[]).is_err());
        assert_eq!(m.sequence_stage(), Some(Stage::Ready));

        m.display_mut().fail_writes = false;
        m.poll(2610, false, &[]).unwrap();
        assert_eq!(m.sequence_stage(), None);
        assert_eq!(m.display().text(0), "CPU:  67°C 45.6%");
    }

    #[test]
    fn test_stage_message_retried() {
        let mut m = monitor(&Config::default());
        m.start(0).unwrap();

        m.display_mut().fail_writes = true;
        assert!(m.poll(600, false, &[]).is_err());
        assert_eq!(m.display().text(0), "GearPulse");

        m.display_mut().fail_writes = false;
        m.poll(610, false, &[]).unwrap();
        assert_eq!(rows(&m), ("System Monitor".into(), "Starting...".into()));
    }

    #[test]
    fn test_reinit_display_redraws_view() {
        let mut m = monitor(&Config::default());
        m.display_mut().initialized = false;
        assert_eq!(m.start(0), Err(DisplayError::NotInitialized));

        m.reinit_display().unwrap();
        m.poll(10, false, &[]).unwrap();
        assert!(m.display().backlight);
        assert_eq!(m.display().text(0), "GearPulse");

        for t in [600, 1600, 2600] {
            m.poll(t, false, &[]).unwrap();
        }
        m.poll(3000, false, RECORD).unwrap();

        // Controller reset behind our back
        m.display_mut().clear().unwrap();
        m.reinit_display().unwrap();
        assert!(m.display().backlight);
        assert_eq!(m.display().text(0), "CPU:  67°C 45.6%");
    }
}
