//! # Processing Module
//!
//! The pure half of the pipeline: capture-rectangle geometry and
//! nearest-neighbor magnification. Nothing here touches the display.

pub mod geometry;
pub mod scale;

pub use geometry::{CaptureRect, DisplayBounds, clamp_capture};
pub use scale::magnify_into;
