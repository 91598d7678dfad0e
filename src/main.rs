use anyhow::Result;
use tracing_subscriber::EnvFilter;

use magnify::MagnifierConfig;

/// No CLI surface: the magnifier's behavior is fully defined by the
/// compile-time defaults in [`MagnifierConfig`]. Logging verbosity is the
/// one runtime knob, via `RUST_LOG`.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("magnify=info")),
        )
        .init();

    magnify::run(MagnifierConfig::default())
}
