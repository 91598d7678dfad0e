//! # Session Loop
//!
//! Ties the magnifier together: a single-threaded polling loop that tracks
//! the pointer, drains input events through the state machine, renders when
//! asked to, and sleeps a little each tick so an idle magnifier costs
//! nearly no CPU.
//!
//! The loop has two states, running and terminated. Termination comes only
//! from the state machine (quit key or an unrecognized button); the backend
//! releases its windowing resources when the session is dropped.

use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::capture::DisplayBackend;
use crate::config::MagnifierConfig;
use crate::error::Result;
use crate::render::Renderer;
use crate::state::{Action, FocalPoint, SessionState, WindowPosition};

/// Loop state after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Running,
    Terminated,
}

/// One magnifier session over a display backend.
pub struct Session<D: DisplayBackend> {
    backend: D,
    state: SessionState,
    renderer: Renderer,
    tick: Duration,
    last_pointer: Option<(i32, i32)>,
    pending_render: bool,
}

impl<D: DisplayBackend> Session<D> {
    /// Build a session: validates the configuration and seeds the focal
    /// point from an initial pointer query.
    pub fn new(mut backend: D, config: &MagnifierConfig) -> Result<Self> {
        config.validate()?;

        let bounds = backend.bounds();
        let (x, y) = backend.pointer_position()?;
        let window_size = config.window_size() as i32;
        let window = WindowPosition {
            x: bounds.width as i32 - (window_size + config.margin),
            y: bounds.height as i32 - (window_size + config.margin),
        };
        let state = SessionState::new(config, bounds, FocalPoint { x, y }, window);

        Ok(Self {
            backend,
            state,
            renderer: Renderer::new(config),
            tick: config.tick,
            last_pointer: None,
            pending_render: false,
        })
    }

    /// Current session state, for inspection in tests.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run until terminated. Returns Ok on a user-initiated shutdown.
    pub fn run(&mut self) -> Result<()> {
        info!(
            ratio = self.state.zoom.ratio(),
            capture = self.state.zoom.capture_size(),
            "session started"
        );
        while self.tick_once()? == LoopStatus::Running {
            thread::sleep(self.tick);
        }
        info!("session terminated");
        Ok(())
    }

    /// One loop iteration: poll the pointer, then drain pending events.
    ///
    /// A frame skipped by a recoverable capture failure leaves a render
    /// pending, so the next tick retries even when the pointer holds
    /// still and no event arrives.
    pub fn tick_once(&mut self) -> Result<LoopStatus> {
        let pointer = self.backend.pointer_position()?;
        if self.last_pointer != Some(pointer) {
            let (x, y) = pointer;
            self.state.focal = FocalPoint { x, y };
            self.last_pointer = Some(pointer);
            self.pending_render = true;
        }
        if self.pending_render {
            self.render()?;
        }

        while let Some(event) = self.backend.poll_event()? {
            match self.state.apply(event) {
                Action::None => {}
                Action::Render => self.render()?,
                Action::MoveWindow(pos) => self.backend.move_window(pos)?,
                Action::Terminate => {
                    debug!(?event, "terminating");
                    return Ok(LoopStatus::Terminated);
                }
            }
        }

        Ok(LoopStatus::Running)
    }

    fn render(&mut self) -> Result<()> {
        let presented = self.renderer.render(&mut self.backend, &self.state)?;
        self.pending_render = !presented;
        Ok(())
    }
}
