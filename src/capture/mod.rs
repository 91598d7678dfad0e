//! # Display Backend
//!
//! The seam between the magnifier core and the windowing system. The
//! session loop, renderer and state machine only ever talk to the
//! [`DisplayBackend`] trait; the one production implementation is
//! [`x11::X11Display`], and the tests drive the same code paths with an
//! in-memory mock.
//!
//! All calls are synchronous. Captures and event polls may block on the
//! display server with no timeout; a hung server hangs the process, an
//! accepted limitation for a single-purpose tool.

pub mod x11;

use crate::error::Result;
use crate::processing::geometry::{CaptureRect, DisplayBounds};
use crate::state::{InputEvent, WindowPosition};

/// A raw pixel block captured from the screen.
///
/// Rows are `stride` bytes apart, pixels are 32-bit ZPixmap values.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub data: Vec<u8>,
    pub size: u32,
    pub stride: usize,
}

/// Everything the magnifier needs from the windowing system.
pub trait DisplayBackend {
    /// Screen dimensions, fixed for the lifetime of the connection.
    fn bounds(&self) -> DisplayBounds;

    /// Current global pointer position in root coordinates.
    fn pointer_position(&mut self) -> Result<(i32, i32)>;

    /// Capture a rectangular region of the root display surface.
    ///
    /// Fails with a recoverable error if the rectangle cannot be read;
    /// the caller skips the frame and retries next tick.
    fn capture_region(&mut self, rect: CaptureRect) -> Result<Snapshot>;

    /// Blit the output buffer into the magnifier window.
    fn present(&mut self, pixels: &[u8]) -> Result<()>;

    /// Move the magnifier window to a new root position.
    fn move_window(&mut self, pos: WindowPosition) -> Result<()>;

    /// Drain one pending input event, without blocking. `None` means the
    /// queue is empty for this tick.
    fn poll_event(&mut self) -> Result<Option<InputEvent>>;
}
