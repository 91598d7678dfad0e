//! # Configuration
//!
//! Compile-time constants for the magnifier, collected in one struct so the
//! pure parts of the pipeline can be driven with other values under test.
//! There is deliberately no CLI surface and no config file: the tool's
//! behavior is fully defined by these defaults.

use std::time::Duration;

use crate::error::{MagnifierError, Result};

/// Smallest permitted capture square, in screen pixels. Zooming in stops
/// once the capture region would shrink below this.
pub const MIN_CAPTURE: u32 = 4;

/// Magnifier settings.
///
/// The invariant `capture = output_size / ratio` must stay exact while the
/// ratio is doubled and halved, so both `output_size` and `initial_ratio`
/// are required to be powers of two.
#[derive(Debug, Clone)]
pub struct MagnifierConfig {
    /// Side length of the square output buffer, in pixels.
    pub output_size: u32,
    /// Border inset between the window edge and the rendered image.
    pub padding: u32,
    /// Starting magnification factor.
    pub initial_ratio: u32,
    /// Margin kept between the window and the screen edge when the window
    /// is recentered.
    pub margin: i32,
    /// Sleep per loop iteration, bounding CPU usage.
    pub tick: Duration,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            output_size: 512,
            padding: 2,
            initial_ratio: 4,
            margin: 10,
            tick: Duration::from_millis(1),
        }
    }
}

impl MagnifierConfig {
    /// Outer window side length: the output buffer plus padding on each side.
    pub fn window_size(&self) -> u32 {
        self.output_size + 2 * self.padding
    }

    /// Validate the configuration before any display resource is created.
    pub fn validate(&self) -> Result<()> {
        if !self.output_size.is_power_of_two() {
            return Err(MagnifierError::Config(format!(
                "output size must be a power of two, got {}",
                self.output_size
            )));
        }
        if !self.initial_ratio.is_power_of_two() {
            return Err(MagnifierError::Config(format!(
                "initial ratio must be a power of two, got {}",
                self.initial_ratio
            )));
        }
        if self.output_size / self.initial_ratio < MIN_CAPTURE {
            return Err(MagnifierError::Config(format!(
                "initial ratio {} leaves a capture region below {} pixels",
                self.initial_ratio, MIN_CAPTURE
            )));
        }
        Ok(())
    }
}
