//! Splash screens and their compact `url:duration` text encoding

use log::warn;
use std::collections::VecDeque;

/// Duration in seconds used when an entry does not carry a valid one
pub const DEFAULT_SPLASH_DURATION: f32 = 2.0;

/// A timed introductory image shown before loading begins.
#[derive(Debug, Clone, PartialEq)]
pub struct SplashScreen {
    pub url: String,
    /// Display time in seconds
    pub duration: f32,
}

impl SplashScreen {
    pub fn new(url: impl Into<String>, duration: f32) -> Self {
        Self {
            url: url.into(),
            duration,
        }
    }

    /// Splash screen shown for [`DEFAULT_SPLASH_DURATION`]
    pub fn with_default_duration(url: impl Into<String>) -> Self {
        Self::new(url, DEFAULT_SPLASH_DURATION)
    }

    /// Encode as `"<url>:<duration>"`.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.url, self.duration)
    }

    /// Decode a `"<url>:<duration>"` token.
    ///
    /// The token is split on its first colon. A missing colon or a duration
    /// that is not a finite, non-negative number yields the default duration.
    /// Empty tokens decode to `None`.
    pub fn decode(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        let Some((url, duration_text)) = token.split_once(':') else {
            warn!("splash screen '{token}' has no duration, using {DEFAULT_SPLASH_DURATION}s");
            return Some(Self::with_default_duration(token));
        };
        let duration = match parse_duration(duration_text) {
            Some(duration) => duration,
            None => {
                warn!(
                    "splash screen '{url}' has invalid duration '{duration_text}', using {DEFAULT_SPLASH_DURATION}s"
                );
                DEFAULT_SPLASH_DURATION
            }
        };
        Some(Self::new(url, duration))
    }
}

fn parse_duration(text: &str) -> Option<f32> {
    text.trim()
        .parse::<f32>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Ordered queue of splash screens being presented.
///
/// The front entry is the one on screen; it is dropped once its duration
/// has elapsed.
#[derive(Debug, Clone, Default)]
pub struct SplashQueue {
    screens: VecDeque<SplashScreen>,
    /// Seconds the front entry has been shown
    shown_for: f32,
}

impl SplashQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue contents and restart timing.
    pub fn set(&mut self, screens: impl IntoIterator<Item = SplashScreen>) {
        self.screens = screens.into_iter().collect();
        self.shown_for = 0.0;
    }

    /// The splash screen currently on screen
    pub fn current(&self) -> Option<&SplashScreen> {
        self.screens.front()
    }

    /// Seconds the current splash screen has been shown
    pub fn shown_for(&self) -> f32 {
        self.shown_for
    }

    /// Advance presentation time, dropping every entry whose duration has
    /// run out. Leftover time carries over to the next entry.
    pub fn advance(&mut self, elapsed: f32) {
        self.shown_for += elapsed.max(0.0);
        while let Some(front) = self.screens.front() {
            if self.shown_for < front.duration {
                break;
            }
            self.shown_for -= front.duration;
            self.screens.pop_front();
        }
        if self.screens.is_empty() {
            self.shown_for = 0.0;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn clear(&mut self) {
        self.screens.clear();
        self.shown_for = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_keeps_url_and_duration() {
        let splash = SplashScreen::new("a.png", 3.5);
        assert_eq!(splash.encode(), "a.png:3.5");
        assert_eq!(SplashScreen::decode(&splash.encode()), Some(splash));
    }

    #[test]
    fn missing_colon_uses_default_duration() {
        let decoded = SplashScreen::decode("b.png").unwrap();
        assert_eq!(decoded.url, "b.png");
        assert_eq!(decoded.duration, DEFAULT_SPLASH_DURATION);
    }

    #[test]
    fn invalid_duration_uses_default() {
        let decoded = SplashScreen::decode("c.png:notanumber").unwrap();
        assert_eq!(decoded.url, "c.png");
        assert_eq!(decoded.duration, DEFAULT_SPLASH_DURATION);
    }

    #[test]
    fn negative_and_non_finite_durations_use_default() {
        assert_eq!(
            SplashScreen::decode("d.png:-1").unwrap().duration,
            DEFAULT_SPLASH_DURATION
        );
        assert_eq!(
            SplashScreen::decode("d.png:inf").unwrap().duration,
            DEFAULT_SPLASH_DURATION
        );
        assert_eq!(
            SplashScreen::decode("d.png:").unwrap().duration,
            DEFAULT_SPLASH_DURATION
        );
    }

    #[test]
    fn splits_on_first_colon() {
        let decoded = SplashScreen::decode("logo.png:1.5:extra").unwrap();
        assert_eq!(decoded.url, "logo.png");
        assert_eq!(decoded.duration, DEFAULT_SPLASH_DURATION);
    }

    #[test]
    fn whole_number_durations_round_trip() {
        let splash = SplashScreen::with_default_duration("e.png");
        assert_eq!(splash.encode(), "e.png:2");
        assert_eq!(SplashScreen::decode("e.png:2"), Some(splash));
    }

    #[test]
    fn empty_token_is_skipped() {
        assert_eq!(SplashScreen::decode(""), None);
    }

    #[test]
    fn queue_advances_through_entries() {
        let mut queue = SplashQueue::new();
        queue.set(vec![
            SplashScreen::new("one.png", 1.0),
            SplashScreen::new("two.png", 0.5),
        ]);
        assert_eq!(queue.current().unwrap().url, "one.png");

        queue.advance(0.75);
        assert_eq!(queue.current().unwrap().url, "one.png");

        queue.advance(0.5);
        assert_eq!(queue.current().unwrap().url, "two.png");
        assert!((queue.shown_for() - 0.25).abs() < 1e-6);

        queue.advance(0.25);
        assert!(queue.is_empty());
    }

    #[test]
    fn long_frame_skips_several_entries() {
        let mut queue = SplashQueue::new();
        queue.set(vec![
            SplashScreen::new("one.png", 0.5),
            SplashScreen::new("two.png", 0.5),
            SplashScreen::new("three.png", 5.0),
        ]);
        queue.advance(1.2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current().unwrap().url, "three.png");
    }

    #[test]
    fn zero_duration_entries_pop_immediately() {
        let mut queue = SplashQueue::new();
        queue.set(vec![SplashScreen::new("flash.png", 0.0)]);
        queue.advance(0.0);
        assert!(queue.is_empty());
    }
}
