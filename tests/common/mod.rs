//! Shared test backend: an in-memory [`DisplayBackend`] that scripts
//! pointer positions and input events and records everything the session
//! does to it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use magnify::capture::{DisplayBackend, Snapshot};
use magnify::error::{MagnifierError, Result};
use magnify::processing::geometry::{CaptureRect, DisplayBounds};
use magnify::state::{InputEvent, WindowPosition};

/// Observable side of the mock, shared with the test body.
#[derive(Default)]
pub struct MockProbe {
    /// Position returned by the next pointer query.
    pub pointer: (i32, i32),
    /// Number of pointer queries served.
    pub pointer_queries: u32,
    /// Events handed out by `poll_event`, in order.
    pub events: VecDeque<InputEvent>,
    /// Number of frames blitted into the window.
    pub presented: u32,
    /// Number of capture requests, successful or not.
    pub captures: u32,
    /// Every window move the session requested.
    pub moves: Vec<WindowPosition>,
    /// Fail this many upcoming capture requests with a recoverable error.
    pub fail_captures: u32,
    /// When set, captures return a snapshot of this side length instead
    /// of the requested one.
    pub snapshot_size: Option<u32>,
    /// Set when the backend is dropped, i.e. resources were released.
    pub released: bool,
}

pub struct MockDisplay {
    bounds: DisplayBounds,
    probe: Rc<RefCell<MockProbe>>,
}

impl MockDisplay {
    pub fn new() -> (Self, Rc<RefCell<MockProbe>>) {
        let probe = Rc::new(RefCell::new(MockProbe::default()));
        let display = Self {
            bounds: DisplayBounds {
                width: 1920,
                height: 1080,
            },
            probe: probe.clone(),
        };
        (display, probe)
    }
}

impl DisplayBackend for MockDisplay {
    fn bounds(&self) -> DisplayBounds {
        self.bounds
    }

    fn pointer_position(&mut self) -> Result<(i32, i32)> {
        let mut probe = self.probe.borrow_mut();
        probe.pointer_queries += 1;
        Ok(probe.pointer)
    }

    fn capture_region(&mut self, rect: CaptureRect) -> Result<Snapshot> {
        let mut probe = self.probe.borrow_mut();
        probe.captures += 1;
        if probe.fail_captures > 0 {
            probe.fail_captures -= 1;
            return Err(MagnifierError::Capture("scripted failure".into()));
        }
        let size = probe.snapshot_size.unwrap_or(rect.size);
        let stride = size as usize * 4;
        Ok(Snapshot {
            data: vec![0x20; stride * size as usize],
            size,
            stride,
        })
    }

    fn present(&mut self, _pixels: &[u8]) -> Result<()> {
        self.probe.borrow_mut().presented += 1;
        Ok(())
    }

    fn move_window(&mut self, pos: WindowPosition) -> Result<()> {
        self.probe.borrow_mut().moves.push(pos);
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Option<InputEvent>> {
        Ok(self.probe.borrow_mut().events.pop_front())
    }
}

impl Drop for MockDisplay {
    fn drop(&mut self) {
        self.probe.borrow_mut().released = true;
    }
}
