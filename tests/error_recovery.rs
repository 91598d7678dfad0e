//! Integration tests for per-frame error recovery: a failed screen
//! capture skips that frame and keeps the loop alive, while the previous
//! buffer contents stay on screen.

mod common;

use common::MockDisplay;
use magnify::session::LoopStatus;
use magnify::state::InputEvent;
use magnify::{MagnifierConfig, Session};

#[test]
fn failed_capture_skips_the_frame_and_keeps_running() {
    let (display, probe) = MockDisplay::new();
    probe.borrow_mut().fail_captures = 1;

    let mut session = Session::new(display, &MagnifierConfig::default()).unwrap();
    assert_eq!(session.tick_once().unwrap(), LoopStatus::Running);

    let probe = probe.borrow();
    assert_eq!(probe.captures, 1);
    assert_eq!(probe.presented, 0, "skipped frame must not be presented");
}

#[test]
fn failed_capture_is_retried_on_the_next_tick() {
    let (display, probe) = MockDisplay::new();
    probe.borrow_mut().fail_captures = 1;

    let mut session = Session::new(display, &MagnifierConfig::default()).unwrap();

    // The pointer never moves and no event arrives; the retry must come
    // from the skipped frame alone.
    assert_eq!(session.tick_once().unwrap(), LoopStatus::Running);
    assert_eq!(session.tick_once().unwrap(), LoopStatus::Running);

    let probe = probe.borrow();
    assert_eq!(probe.captures, 2, "skipped frame was not retried");
    assert_eq!(probe.presented, 1);
}

#[test]
fn presented_frame_is_not_rendered_again_on_an_idle_pointer() {
    let (display, probe) = MockDisplay::new();

    let mut session = Session::new(display, &MagnifierConfig::default()).unwrap();
    session.tick_once().unwrap();
    session.tick_once().unwrap();

    let probe = probe.borrow();
    assert_eq!(probe.captures, 1);
    assert_eq!(probe.presented, 1);
}

#[test]
fn undersized_snapshot_degrades_to_a_partial_frame() {
    let (display, probe) = MockDisplay::new();
    // Backend hands back less than the requested rectangle, as a server
    // might around a resolution change.
    probe.borrow_mut().snapshot_size = Some(16);

    let mut session = Session::new(display, &MagnifierConfig::default()).unwrap();
    assert_eq!(session.tick_once().unwrap(), LoopStatus::Running);

    assert_eq!(probe.borrow().presented, 1);
}

#[test]
fn loop_recovers_once_captures_succeed_again() {
    let (display, probe) = MockDisplay::new();
    probe.borrow_mut().fail_captures = 3;

    let mut session = Session::new(display, &MagnifierConfig::default()).unwrap();

    // Each tick retries: an exposure forces a render attempt per tick.
    for _ in 0..4 {
        probe.borrow_mut().events.push_back(InputEvent::Exposed);
        assert_eq!(session.tick_once().unwrap(), LoopStatus::Running);
    }

    let probe = probe.borrow();
    assert!(probe.captures >= 4);
    assert!(probe.presented >= 1, "rendering never resumed after failures");
}
