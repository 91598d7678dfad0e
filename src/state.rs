//! # Session State & Input Transitions
//!
//! All mutable state of a magnifier session lives in [`SessionState`], and
//! every input event is a closed [`InputEvent`] variant. Each event maps to
//! exactly one [`Action`] telling the session loop what to do next, which
//! keeps the whole transition table testable without a display connection.

use crate::config::{MIN_CAPTURE, MagnifierConfig};
use crate::processing::geometry::DisplayBounds;

/// The screen coordinate the capture rectangle is centered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocalPoint {
    pub x: i32,
    pub y: i32,
}

/// Current magnification factor and the capture size derived from it.
///
/// Invariant: `capture_size * ratio == output_size`, `ratio >= 1` and
/// `capture_size >= MIN_CAPTURE`. The two zoom guards below are the only
/// protection against degenerate rectangles, so they are the only way to
/// mutate this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomState {
    ratio: u32,
    capture_size: u32,
    output_size: u32,
}

impl ZoomState {
    pub fn new(output_size: u32, ratio: u32) -> Self {
        Self {
            ratio,
            capture_size: output_size / ratio,
            output_size,
        }
    }

    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    pub fn capture_size(&self) -> u32 {
        self.capture_size
    }

    /// Double the ratio, refusing once the capture region would shrink
    /// below `MIN_CAPTURE`. Returns whether anything changed.
    pub fn zoom_in(&mut self) -> bool {
        if self.capture_size <= MIN_CAPTURE {
            return false;
        }
        self.ratio *= 2;
        self.capture_size = self.output_size / self.ratio;
        true
    }

    /// Halve the ratio, refusing below 1. Returns whether anything changed.
    pub fn zoom_out(&mut self) -> bool {
        if self.ratio < 2 {
            return false;
        }
        self.ratio /= 2;
        self.capture_size = self.output_size / self.ratio;
        true
    }
}

/// Top-left corner of the output window in root coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

/// Semantic key, resolved from the server's keyboard mapping by the
/// backend so the transition table never matches raw keycodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Quit,
    Left,
    Right,
    Up,
    Down,
    Other,
}

/// One input event delivered by the display backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerMoved { x: i32, y: i32 },
    KeyPressed(Key),
    ButtonPressed { button: u8, x: i32, y: i32 },
    Exposed,
}

/// What the session loop should do after applying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Render,
    MoveWindow(WindowPosition),
    Terminate,
}

/// Mutable state of one magnifier session.
pub struct SessionState {
    pub focal: FocalPoint,
    pub zoom: ZoomState,
    pub window: WindowPosition,
    bounds: DisplayBounds,
    window_size: i32,
    margin: i32,
}

impl SessionState {
    pub fn new(
        config: &MagnifierConfig,
        bounds: DisplayBounds,
        focal: FocalPoint,
        window: WindowPosition,
    ) -> Self {
        Self {
            focal,
            zoom: ZoomState::new(config.output_size, config.initial_ratio),
            window,
            bounds,
            window_size: config.window_size() as i32,
            margin: config.margin,
        }
    }

    /// Apply one input event and report the follow-up action.
    ///
    /// Events are processed in delivery order; zoom transitions that hit a
    /// guard still count as handled but trigger no render.
    pub fn apply(&mut self, event: InputEvent) -> Action {
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.focal = FocalPoint { x, y };
                Action::Render
            }
            InputEvent::KeyPressed(Key::Escape) | InputEvent::KeyPressed(Key::Quit) => {
                Action::Terminate
            }
            InputEvent::KeyPressed(Key::Right) => {
                self.focal.x += 1;
                Action::Render
            }
            InputEvent::KeyPressed(Key::Left) => {
                self.focal.x -= 1;
                Action::Render
            }
            InputEvent::KeyPressed(Key::Up) => {
                self.focal.y -= 1;
                Action::Render
            }
            InputEvent::KeyPressed(Key::Down) => {
                self.focal.y += 1;
                Action::Render
            }
            InputEvent::KeyPressed(Key::Other) => Action::None,
            InputEvent::Exposed => Action::Render,
            InputEvent::ButtonPressed { button: 4, .. } => {
                if self.zoom.zoom_in() {
                    Action::Render
                } else {
                    Action::None
                }
            }
            InputEvent::ButtonPressed { button: 5, .. } => {
                if self.zoom.zoom_out() {
                    Action::Render
                } else {
                    Action::None
                }
            }
            InputEvent::ButtonPressed { button: 3, x, y } => {
                self.window = self.recenter(x, y);
                Action::MoveWindow(self.window)
            }
            InputEvent::ButtonPressed { .. } => Action::Terminate,
        }
    }

    /// Window position centered on a click, clamped so the whole window
    /// stays on screen with the configured margin.
    fn recenter(&self, x: i32, y: i32) -> WindowPosition {
        let clamp = |v: i32, limit: i32| {
            v.min(limit - self.window_size - self.margin).max(self.margin)
        };
        WindowPosition {
            x: clamp(x - self.window_size / 2, self.bounds.width as i32),
            y: clamp(y - self.window_size / 2, self.bounds.height as i32),
        }
    }
}
