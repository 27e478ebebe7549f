//! Platform event polling boundary

use log::debug;
use std::cell::Cell;
use std::rc::Rc;

/// Mouse position and button state reported by the platform
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    /// Cursor position in window pixels
    pub x: i32,
    pub y: i32,
    /// Accumulated wheel position
    pub wheel: i32,
    /// Button bitmask, bit 0 = left, bit 1 = right, bit 2 = middle
    pub buttons: u8,
}

impl MouseState {
    pub fn is_pressed(&self, button: u8) -> bool {
        button < 8 && self.buttons & (1 << button) != 0
    }
}

/// Polls window and input events once per frame.
pub trait Platform {
    /// Pump pending events, updating the viewport size, graphics debug/reset
    /// flags and mouse state in place. Returns `true` to request termination.
    fn process_events(
        &mut self,
        width: &mut u32,
        height: &mut u32,
        debug: &mut bool,
        reset: &mut bool,
        mouse: &mut MouseState,
    ) -> bool;
}

/// Shared control over a [`HeadlessPlatform`] after it has been handed to a game.
#[derive(Debug, Clone, Default)]
pub struct PlatformHandle {
    stop: Rc<Cell<bool>>,
    resize: Rc<Cell<Option<(u32, u32)>>>,
}

impl PlatformHandle {
    /// Ask the platform to report termination on the next poll.
    pub fn request_stop(&self) {
        self.stop.set(true);
    }

    /// Report a window resize on the next poll.
    pub fn request_resize(&self, width: u32, height: u32) {
        self.resize.set(Some((width, height)));
    }
}

/// A platform without a window. Terminates after an optional number of
/// polls or when stopped through its [`PlatformHandle`].
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    frame_limit: Option<u64>,
    polled: u64,
    handle: PlatformHandle,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminate once `frames` polls have completed.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn handle(&self) -> PlatformHandle {
        self.handle.clone()
    }

    /// Number of polls that did not request termination
    pub fn polled(&self) -> u64 {
        self.polled
    }
}

impl Platform for HeadlessPlatform {
    fn process_events(
        &mut self,
        width: &mut u32,
        height: &mut u32,
        _debug: &mut bool,
        _reset: &mut bool,
        _mouse: &mut MouseState,
    ) -> bool {
        if self.handle.stop.get() {
            debug!("headless platform stopped by request");
            return true;
        }
        if self.frame_limit.is_some_and(|limit| self.polled >= limit) {
            debug!("headless platform reached frame limit");
            return true;
        }
        if let Some((w, h)) = self.handle.resize.take() {
            *width = w;
            *height = h;
        }
        self.polled += 1;
        false
    }
}
