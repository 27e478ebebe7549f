//! Game clock with pause accounting

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic source of seconds elapsed since some fixed epoch.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall-clock-immune time source backed by [`Instant`].
///
/// The epoch is captured once, when the source is created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTimeSource {
    epoch: Instant,
}

impl MonotonicTimeSource {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Host-driven time source for deterministic stepping and tests.
///
/// Clones share the same underlying time, so the host can keep a handle
/// after giving one to the [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<f64>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `seconds`. Negative steps are ignored.
    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }

    /// Jump to an absolute time. Times earlier than the current one are ignored.
    pub fn set(&self, seconds: f64) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Tracks absolute time and the total time spent paused.
///
/// Game time is absolute time minus every completed pause interval. While a
/// pause is open, game time stays frozen at the moment the pause began.
pub struct Clock {
    source: Box<dyn TimeSource>,
    /// Highest absolute time reported so far
    last_absolute: Cell<f64>,
    /// Sum of all completed pause intervals in seconds
    paused_time_total: f64,
    /// Absolute time at which the open pause began
    paused_time_last: f64,
    paused: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a clock whose epoch is now
    pub fn new() -> Self {
        Self::with_source(MonotonicTimeSource::new())
    }

    pub fn with_source(source: impl TimeSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            last_absolute: Cell::new(0.0),
            paused_time_total: 0.0,
            paused_time_last: 0.0,
            paused: false,
        }
    }

    /// Seconds since the epoch. Never decreases between calls.
    pub fn absolute_time(&self) -> f64 {
        let now = self.source.now().max(self.last_absolute.get());
        self.last_absolute.set(now);
        now
    }

    /// Seconds since the epoch, excluding time spent paused.
    pub fn game_time(&self) -> f64 {
        if self.paused {
            self.paused_time_last - self.paused_time_total
        } else {
            self.absolute_time() - self.paused_time_total
        }
    }

    /// Total seconds spent in completed pauses
    pub fn paused_time_total(&self) -> f64 {
        self.paused_time_total
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Open a pause interval. Ignored if one is already open.
    pub fn begin_pause(&mut self) {
        if !self.paused {
            self.paused_time_last = self.absolute_time();
            self.paused = true;
        }
    }

    /// Close the open pause interval and add it to the paused total.
    pub fn end_pause(&mut self) {
        if self.paused {
            self.paused_time_total += self.absolute_time() - self.paused_time_last;
            self.paused = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_clock() -> (Clock, ManualTimeSource) {
        let source = ManualTimeSource::new();
        (Clock::with_source(source.clone()), source)
    }

    #[test]
    fn test_game_time_tracks_absolute_when_running() {
        let (clock, time) = manual_clock();
        time.advance(2.5);
        assert!((clock.absolute_time() - 2.5).abs() < 1e-10);
        assert!((clock.game_time() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_game_time_frozen_while_paused() {
        let (mut clock, time) = manual_clock();
        time.advance(1.0);
        clock.begin_pause();
        let frozen = clock.game_time();

        time.advance(5.0);
        assert_eq!(clock.game_time(), frozen);
        assert!((clock.absolute_time() - 6.0).abs() < 1e-10);

        clock.end_pause();
        assert!((clock.paused_time_total() - 5.0).abs() < 1e-10);
        assert!((clock.game_time() - frozen).abs() < 1e-10);

        time.advance(0.5);
        assert!((clock.game_time() - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_nested_begin_pause_keeps_first_timestamp() {
        let (mut clock, time) = manual_clock();
        time.advance(1.0);
        clock.begin_pause();
        time.advance(1.0);
        clock.begin_pause();
        time.advance(1.0);
        clock.end_pause();
        assert!((clock.paused_time_total() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_end_pause_without_begin_is_ignored() {
        let (mut clock, time) = manual_clock();
        time.advance(3.0);
        clock.end_pause();
        assert_eq!(clock.paused_time_total(), 0.0);
    }

    #[test]
    fn test_manual_source_never_moves_backwards() {
        let time = ManualTimeSource::new();
        time.set(4.0);
        time.set(1.0);
        time.advance(-2.0);
        assert_eq!(time.now(), 4.0);
    }

    #[test]
    fn test_absolute_time_monotonic() {
        let clock = Clock::new();
        let mut last = clock.absolute_time();
        for _ in 0..1000 {
            let now = clock.absolute_time();
            assert!(now >= last);
            last = now;
        }
    }
}
