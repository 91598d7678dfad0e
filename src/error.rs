//! # Error Types
//!
//! Error taxonomy for the magnifier. There are only two interesting
//! classes at runtime:
//!
//! - **Fatal**: the display connection is gone (or was never there).
//!   These end the session loop and surface through `main`.
//! - **Recoverable**: a single screen snapshot failed, usually because the
//!   requested rectangle raced a resolution change. The renderer skips the
//!   frame and the loop tries again on the next tick.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MagnifierError>;

#[derive(Debug, Error)]
pub enum MagnifierError {
    /// No display server reachable. Nothing else runs after this.
    #[error("cannot open display: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),

    /// The connection dropped after setup. Fatal for the session loop.
    #[error("display connection lost: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    /// A request was rejected by the server. Fatal unless wrapped as
    /// `Capture` by the call site.
    #[error("display request failed: {0}")]
    Protocol(#[from] x11rb::errors::ReplyError),

    /// Resource id allocation failed during setup.
    #[error("display id allocation failed: {0}")]
    Id(#[from] x11rb::errors::ReplyOrIdError),

    /// One screen snapshot failed. The frame is skipped, the loop goes on.
    #[error("screen capture failed: {0}")]
    Capture(String),

    /// Rejected compile-time configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MagnifierError {
    /// Whether the session loop may continue after this error.
    ///
    /// Only per-frame capture failures are recoverable; everything else
    /// means the display connection or setup is unusable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MagnifierError::Capture(_))
    }
}
