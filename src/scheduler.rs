/// Longest frame delta fed into the accumulator.
pub const MAX_FRAME_DELTA_MS: f64 = 250.0;
/// Most simulation ticks run for a single rendered frame.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

const COUNTER_WINDOW_MS: f64 = 1000.0;

/// The host's frame-presentation hook: resolves right before the next paint
/// with the current time in milliseconds.
pub trait FrameHost {
    async fn next_frame(&mut self) -> f64;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimestepLimits {
    pub max_frame_delta_ms: f64,
    pub max_ticks_per_frame: u32,
}

impl Default for TimestepLimits {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
        }
    }
}

/// Fixed-timestep accumulator decoupling frame delivery from tick rate.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    ms_per_update: f64,
    accumulator: f64,
    last_frame_ms: Option<f64>,
    limits: TimestepLimits,
}

impl FixedTimestep {
    pub fn new(ms_per_update: f64, limits: TimestepLimits) -> Self {
        Self {
            ms_per_update: ms_per_update.max(f64::EPSILON),
            accumulator: 0.0,
            last_frame_ms: None,
            limits,
        }
    }

    pub fn ms_per_update(&self) -> f64 {
        self.ms_per_update
    }

    #[cfg(test)]
    fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn set_ms_per_update(&mut self, ms_per_update: f64) {
        self.ms_per_update = ms_per_update.max(f64::EPSILON);
    }

    /// Drops leftover time and restarts the clock at `now_ms`.
    pub fn restart(&mut self, now_ms: f64) {
        self.accumulator = 0.0;
        self.last_frame_ms = Some(now_ms);
    }

    /// Keeps the clock current without accumulating, so a resume does not
    /// replay the time spent idle.
    pub fn idle(&mut self, now_ms: f64) {
        self.last_frame_ms = Some(now_ms);
    }

    /// Accumulates the frame delta and runs `tick` for every whole update
    /// interval, up to the per-frame cap. Returns the number of ticks run.
    pub fn advance<F: FnMut()>(&mut self, now_ms: f64, mut tick: F) -> u32 {
        let last = self.last_frame_ms.unwrap_or(now_ms);
        self.last_frame_ms = Some(now_ms);
        let delta = (now_ms - last).clamp(0.0, self.limits.max_frame_delta_ms);
        self.accumulator += delta;

        let mut ticks = 0;
        while self.accumulator >= self.ms_per_update && ticks < self.limits.max_ticks_per_frame {
            tick();
            self.accumulator -= self.ms_per_update;
            ticks += 1;
        }
        ticks
    }
}

/// Frames and ticks per second, refreshed once per second.
#[derive(Clone, Debug, Default)]
pub struct PerfCounters {
    pub fps: u32,
    pub tps: u32,
    frames: u32,
    ticks: u32,
    window_start_ms: Option<f64>,
}

impl PerfCounters {
    pub fn reset(&mut self, now_ms: f64) {
        *self = Self {
            window_start_ms: Some(now_ms),
            ..Self::default()
        };
    }

    pub fn record(&mut self, now_ms: f64, ticks: u32) {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frames += 1;
        self.ticks += ticks;

        let elapsed = now_ms - start;
        if elapsed >= COUNTER_WINDOW_MS {
            self.fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
            self.tps = self.ticks;
            self.frames = 0;
            self.ticks = 0;
            self.window_start_ms = Some(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks_over(ms_per_update: f64, total_ms: f64, frame_ms: f64) -> u32 {
        let mut step = FixedTimestep::new(ms_per_update, TimestepLimits::default());
        step.restart(0.0);
        let mut now = 0.0;
        let mut ticks = 0;
        while now < total_ms {
            now += frame_ms;
            ticks += step.advance(now, || {});
        }
        ticks
    }

    #[test]
    fn runs_one_tick_per_interval() {
        let mut step = FixedTimestep::new(100.0, TimestepLimits::default());
        step.restart(0.0);
        assert_eq!(step.advance(50.0, || {}), 0);
        assert_eq!(step.advance(100.0, || {}), 1);
        assert_eq!(step.advance(250.0, || {}), 1);
        assert_eq!(step.accumulator(), 50.0);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut step = FixedTimestep::new(100.0, TimestepLimits::default());
        step.restart(0.0);
        let mut calls = 0;
        assert_eq!(step.advance(10_000.0, || calls += 1), 2);
        assert_eq!(calls, 2);
        assert_eq!(step.accumulator(), 50.0);
    }

    #[test]
    fn ticks_per_frame_are_capped_and_carried_over() {
        let mut step = FixedTimestep::new(10.0, TimestepLimits::default());
        step.restart(0.0);
        assert_eq!(step.advance(250.0, || {}), MAX_TICKS_PER_FRAME);
        assert_eq!(step.accumulator(), 200.0);
        assert_eq!(step.advance(250.0, || {}), MAX_TICKS_PER_FRAME);
        assert_eq!(step.accumulator(), 150.0);
    }

    #[test]
    fn idle_time_is_not_accumulated() {
        let mut step = FixedTimestep::new(100.0, TimestepLimits::default());
        step.restart(0.0);
        step.idle(5_000.0);
        assert_eq!(step.advance(5_016.0, || {}), 0);
        assert_eq!(step.accumulator(), 16.0);
    }

    #[test]
    fn clock_going_backwards_adds_nothing() {
        let mut step = FixedTimestep::new(100.0, TimestepLimits::default());
        step.restart(1_000.0);
        assert_eq!(step.advance(900.0, || {}), 0);
        assert_eq!(step.accumulator(), 0.0);
    }

    #[test]
    fn restart_drops_leftover_time() {
        let mut step = FixedTimestep::new(100.0, TimestepLimits::default());
        step.restart(0.0);
        step.advance(90.0, || {});
        step.restart(90.0);
        assert_eq!(step.accumulator(), 0.0);
        assert_eq!(step.advance(180.0, || {}), 0);
    }

    #[test]
    fn faster_difficulty_ticks_more_often() {
        let hard = ticks_over(50.0, 1_000.0, 16.0);
        let easy = ticks_over(120.0, 1_000.0, 16.0);
        assert!(hard > easy, "hard {hard} easy {easy}");
        assert_eq!(hard, 20);
        assert_eq!(easy, 8);
    }

    #[test]
    fn custom_limits_apply() {
        let limits = TimestepLimits {
            max_frame_delta_ms: 1_000.0,
            max_ticks_per_frame: 2,
        };
        let mut step = FixedTimestep::new(100.0, limits);
        step.restart(0.0);
        assert_eq!(step.advance(1_000.0, || {}), 2);
        assert_eq!(step.accumulator(), 800.0);
    }

    #[test]
    fn counters_refresh_every_second() {
        let mut perf = PerfCounters::default();
        perf.reset(0.0);
        for frame in 1..=50 {
            perf.record(frame as f64 * 20.0, if frame % 2 == 0 { 1 } else { 0 });
        }
        assert_eq!(perf.fps, 50);
        assert_eq!(perf.tps, 25);
    }
}
