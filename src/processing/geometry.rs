//! # Capture Geometry
//!
//! Computes the source rectangle sampled from the screen each frame. The
//! rectangle is centered on the focal point and pushed back inside the
//! display bounds, so the magnifier keeps showing screen content even when
//! the pointer sits in a corner.

use crate::state::FocalPoint;

/// Immutable screen dimensions, queried once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBounds {
    pub width: u32,
    pub height: u32,
}

/// The clamped source rectangle for one frame. Recomputed every render,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRect {
    pub left: i32,
    pub top: i32,
    pub size: u32,
}

/// Clamp a capture square around `focal` to the display bounds.
///
/// Whenever `capture_size` fits the screen, the result satisfies
/// `0 <= left <= width - capture_size` (and the same for `top`). If the
/// capture square is larger than the screen, the origin is floored at 0
/// and the rectangle overhangs the far edge.
pub fn clamp_capture(focal: FocalPoint, capture_size: u32, bounds: DisplayBounds) -> CaptureRect {
    let size = capture_size as i32;
    let half = size / 2;

    let mut left = (focal.x - half).max(0);
    if left + size > bounds.width as i32 {
        left = bounds.width as i32 - size;
    }

    let mut top = (focal.y - half).max(0);
    if top + size > bounds.height as i32 {
        top = bounds.height as i32 - size;
    }

    CaptureRect {
        left: left.max(0),
        top: top.max(0),
        size: capture_size,
    }
}
