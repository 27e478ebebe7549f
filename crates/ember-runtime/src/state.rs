//! Lifecycle state machine: run-loop phase, pause nesting and frame timing.
//!
//! The lifecycle starts UNINITIALIZED, shows splash screens, loads, then
//! alternates between RUNNING and PAUSED. Transitions are driven by
//! [`crate::Game::frame`], [`Lifecycle::pause`] and [`Lifecycle::resume`].

use crate::clock::Clock;
use crate::frame_rate::FrameRateCounter;
use log::debug;

/// Current phase of the run loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Uninitialized,
    Splash,
    Loading,
    Running,
    Paused,
}

impl GameState {
    pub fn as_str(self) -> &'static str {
        match self {
            GameState::Uninitialized => "uninitialized",
            GameState::Splash => "splash",
            GameState::Loading => "loading",
            GameState::Running => "running",
            GameState::Paused => "paused",
        }
    }

    /// Whether frames in this state are rendered and counted toward the
    /// frame rate
    pub fn is_active(self) -> bool {
        matches!(
            self,
            GameState::Splash | GameState::Loading | GameState::Running
        )
    }
}

/// Run-loop state, pause nesting and frame timing.
pub struct Lifecycle {
    state: GameState,
    /// Outstanding `pause()` calls; non-zero means logically paused
    paused_count: u32,
    clock: Clock,
    frame_rate: FrameRateCounter,
    /// Game time of the last sampled frame, captured on the first frame
    last_frame_time: Option<f64>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(Clock::new())
    }
}

impl Lifecycle {
    pub fn new(clock: Clock) -> Self {
        Self {
            state: GameState::Uninitialized,
            paused_count: 0,
            clock,
            frame_rate: FrameRateCounter::new(),
            last_frame_time: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn set_state(&mut self, next: GameState) {
        if self.state != next {
            debug!("state {} -> {}", self.state.as_str(), next.as_str());
            self.state = next;
        }
    }

    pub fn paused_count(&self) -> u32 {
        self.paused_count
    }

    /// Whether any `pause()` is outstanding
    pub fn is_paused(&self) -> bool {
        self.paused_count > 0
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn frame_rate(&self) -> &FrameRateCounter {
        &self.frame_rate
    }

    /// Count one more pause. Only a pause while RUNNING stops game time and
    /// enters PAUSED; in any other state the count still grows.
    pub fn pause(&mut self) {
        if self.state == GameState::Running {
            self.clock.begin_pause();
            self.set_state(GameState::Paused);
        }
        self.paused_count += 1;
    }

    /// Undo one pause. Ignored unless PAUSED. The last matching resume
    /// restarts game time and returns to RUNNING.
    pub fn resume(&mut self) {
        if self.state != GameState::Paused {
            return;
        }
        self.paused_count = self.paused_count.saturating_sub(1);
        if self.paused_count == 0 {
            self.clock.end_pause();
            self.set_state(GameState::Running);
        }
    }

    /// Game time elapsed since the last sampled frame, in seconds.
    pub(crate) fn begin_frame(&mut self) -> f32 {
        let now = self.clock.game_time();
        let last = *self.last_frame_time.get_or_insert(now);
        (now - last) as f32
    }

    /// Count the frame toward the frame rate and remember its time.
    pub(crate) fn end_frame(&mut self) {
        let now = self.clock.game_time();
        self.last_frame_time = Some(self.frame_rate.tick(now));
    }

    /// Back to UNINITIALIZED with no pauses and fresh frame counters.
    pub(crate) fn reset(&mut self) {
        self.clock.end_pause();
        self.paused_count = 0;
        self.last_frame_time = None;
        self.frame_rate.reset(self.clock.game_time());
        self.set_state(GameState::Uninitialized);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;

    fn running() -> (Lifecycle, ManualTimeSource) {
        let time = ManualTimeSource::new();
        let mut lifecycle = Lifecycle::new(Clock::with_source(time.clone()));
        lifecycle.set_state(GameState::Running);
        (lifecycle, time)
    }

    #[test]
    fn pause_and_resume_from_running() {
        let (mut lifecycle, _) = running();
        lifecycle.pause();
        assert_eq!(lifecycle.state(), GameState::Paused);
        assert_eq!(lifecycle.paused_count(), 1);

        lifecycle.resume();
        assert_eq!(lifecycle.state(), GameState::Running);
        assert_eq!(lifecycle.paused_count(), 0);
    }

    #[test]
    fn nested_pauses_need_matching_resumes() {
        let (mut lifecycle, _) = running();
        lifecycle.pause();
        lifecycle.pause();
        lifecycle.pause();
        assert_eq!(lifecycle.paused_count(), 3);

        lifecycle.resume();
        lifecycle.resume();
        assert_eq!(lifecycle.state(), GameState::Paused);
        assert_eq!(lifecycle.paused_count(), 1);

        lifecycle.resume();
        assert_eq!(lifecycle.state(), GameState::Running);
    }

    #[test]
    fn resume_while_running_is_noop() {
        let (mut lifecycle, _) = running();
        lifecycle.resume();
        assert_eq!(lifecycle.state(), GameState::Running);
        assert_eq!(lifecycle.paused_count(), 0);
    }

    #[test]
    fn pause_outside_running_only_counts() {
        let time = ManualTimeSource::new();
        let mut lifecycle = Lifecycle::new(Clock::with_source(time));
        lifecycle.set_state(GameState::Splash);
        lifecycle.pause();
        assert_eq!(lifecycle.state(), GameState::Splash);
        assert_eq!(lifecycle.paused_count(), 1);
        assert!(lifecycle.is_paused());

        // resume is ignored outside PAUSED, so the count stays
        lifecycle.resume();
        assert_eq!(lifecycle.paused_count(), 1);
    }

    #[test]
    fn game_time_frozen_across_pause() {
        let (mut lifecycle, time) = running();
        time.advance(1.0);
        lifecycle.pause();
        let frozen = lifecycle.clock().game_time();
        time.advance(10.0);
        assert_eq!(lifecycle.clock().game_time(), frozen);
        lifecycle.resume();
        assert!((lifecycle.clock().game_time() - frozen).abs() < 1e-10);
    }

    #[test]
    fn paused_count_never_negative_under_random_sequences() {
        let (mut lifecycle, _) = running();
        // deterministic pseudo-random pause/resume mix
        let mut seed: u32 = 0x2545_f491;
        let mut first_pause_state = None;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            if seed % 2 == 0 {
                if lifecycle.paused_count() == 0 {
                    first_pause_state = Some(lifecycle.state());
                }
                lifecycle.pause();
            } else {
                lifecycle.resume();
            }
            let paused = lifecycle.state() == GameState::Paused;
            let expected = lifecycle.paused_count() > 0
                && first_pause_state == Some(GameState::Running);
            assert_eq!(paused, expected);
        }
    }

    #[test]
    fn elapsed_measured_from_last_sampled_frame() {
        let (mut lifecycle, time) = running();
        assert_eq!(lifecycle.begin_frame(), 0.0);
        time.advance(0.5);
        lifecycle.end_frame();

        time.advance(0.25);
        assert!((lifecycle.begin_frame() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reset_closes_open_pause() {
        let (mut lifecycle, time) = running();
        lifecycle.pause();
        time.advance(2.0);
        lifecycle.reset();
        assert_eq!(lifecycle.state(), GameState::Uninitialized);
        assert_eq!(lifecycle.paused_count(), 0);
        assert!(!lifecycle.clock().is_paused());
        assert!((lifecycle.clock().paused_time_total() - 2.0).abs() < 1e-10);
    }
}
