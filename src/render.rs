//! # Render Pipeline
//!
//! One frame, start to finish: clamp the capture rectangle around the
//! focal point, snapshot it from the display, magnify it into the output
//! buffer, blit the buffer into the window.
//!
//! The output buffer is allocated once and owned here exclusively; every
//! frame rewrites the RGB channels of every pixel in place. A failed
//! snapshot skips the frame and leaves the previous contents on screen.

use tracing::warn;

use crate::capture::DisplayBackend;
use crate::config::MagnifierConfig;
use crate::error::Result;
use crate::processing::{clamp_capture, magnify_into};
use crate::state::SessionState;

/// Fixed-size pixel buffer backing the magnifier window, 4 bytes per pixel.
pub struct OutputBuffer {
    side: u32,
    data: Vec<u8>,
}

impl OutputBuffer {
    fn new(side: u32) -> Self {
        Self {
            side,
            data: vec![0; (side * side * 4) as usize],
        }
    }
}

/// Owns the output buffer and drives single frames through the pipeline.
pub struct Renderer {
    buffer: OutputBuffer,
}

impl Renderer {
    pub fn new(config: &MagnifierConfig) -> Self {
        Self {
            buffer: OutputBuffer::new(config.output_size),
        }
    }

    /// Render one frame for the current session state. Returns whether a
    /// frame was actually presented.
    ///
    /// Recoverable capture failures are logged and reported as a skipped
    /// frame (`Ok(false)`) so the caller retries on the next tick;
    /// connection-level failures propagate.
    pub fn render<D: DisplayBackend>(
        &mut self,
        display: &mut D,
        state: &SessionState,
    ) -> Result<bool> {
        let rect = clamp_capture(state.focal, state.zoom.capture_size(), display.bounds());

        let snapshot = match display.capture_region(rect) {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "skipping frame");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        magnify_into(
            &snapshot.data,
            snapshot.stride,
            snapshot.size,
            &mut self.buffer.data,
            self.buffer.side,
            state.zoom.ratio(),
        );

        display.present(&self.buffer.data)?;
        Ok(true)
    }
}
