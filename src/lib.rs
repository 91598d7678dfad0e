//! # Magnify
//!
//! A screen-magnifier overlay for X11. Each tick it samples a square
//! region of the display around the pointer, scales it by an integer
//! ratio with nearest-neighbor replication, and blits the result into a
//! fixed-size always-on-screen window.
//!
//! ## Architecture
//!
//! The crate is organized around one seam and a handful of small modules:
//! - `capture`: the [`capture::DisplayBackend`] trait and its x11rb
//!   implementation
//! - `processing`: pure capture-rectangle geometry and the
//!   nearest-neighbor scaler
//! - `state`: session state plus the input-event transition table
//! - `render`: the per-frame pipeline owning the output buffer
//! - `session`: the polling loop driving everything
//! - `config` / `error`: compile-time defaults and the error taxonomy
//!
//! Everything below the backend trait runs without a display connection,
//! which is how the tests exercise the full loop against a mock.

use anyhow::Result;

pub mod capture;
pub mod config;
pub mod error;
pub mod processing;
pub mod render;
pub mod session;
pub mod state;

pub use capture::{DisplayBackend, Snapshot, x11::X11Display};
pub use config::MagnifierConfig;
pub use error::MagnifierError;
pub use session::{LoopStatus, Session};

/// Connect to the display and run a magnifier session to completion.
///
/// The configuration is validated before any display resource is created,
/// so a bad build constant fails without ever mapping a window.
pub fn run(config: MagnifierConfig) -> Result<()> {
    config.validate()?;
    let backend = X11Display::open(&config)?;
    let mut session = Session::new(backend, &config)?;
    session.run()?;
    Ok(())
}
