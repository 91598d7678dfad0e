//! # X11 Display Backend
//!
//! [`DisplayBackend`] implementation over `x11rb`. Setup is a handful of
//! one-time requests: connect, create the output window in the bottom-right
//! corner, pin its size through WM_NORMAL_HINTS, select input, then try to
//! grab the pointer and the quit key. Grab failures are degraded mode, not
//! fatal: the magnifier still works, it just shares input with everyone
//! else.
//!
//! Keycodes are resolved through the server's keyboard mapping rather than
//! matched as raw numbers, so the arrow/quit bindings survive non-default
//! layouts.

use tracing::{debug, warn};
use x11rb::COPY_DEPTH_FROM_PARENT;
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::properties::WmSizeHints;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{
    AtomEnum, ConfigureWindowAux, ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask,
    Gcontext, GrabMode, GrabStatus, ImageFormat, ModMask, PropMode, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::capture::{DisplayBackend, Snapshot};
use crate::config::MagnifierConfig;
use crate::error::{MagnifierError, Result};
use crate::processing::geometry::{CaptureRect, DisplayBounds};
use crate::state::{InputEvent, Key, WindowPosition};

const WINDOW_TITLE: &[u8] = b"Magnify";

// Glyph pair from the standard cursor font, shown while the pointer grab
// is active.
const CURSOR_GLYPH: u16 = 68;

// Keysyms from X11/keysymdef.h.
const XK_ESCAPE: u32 = 0xff1b;
const XK_Q: u32 = 0x0071;
const XK_LEFT: u32 = 0xff51;
const XK_UP: u32 = 0xff52;
const XK_RIGHT: u32 = 0xff53;
const XK_DOWN: u32 = 0xff54;
const XK_KP_LEFT: u32 = 0xff96;
const XK_KP_UP: u32 = 0xff97;
const XK_KP_RIGHT: u32 = 0xff98;
const XK_KP_DOWN: u32 = 0xff99;

/// Keycode-to-keysym table, fetched once at startup.
struct Keymap {
    min_keycode: u8,
    keysyms_per_keycode: u8,
    keysyms: Vec<u32>,
}

impl Keymap {
    fn keysym(&self, keycode: u8) -> u32 {
        let index =
            usize::from(keycode.saturating_sub(self.min_keycode)) * usize::from(self.keysyms_per_keycode);
        self.keysyms.get(index).copied().unwrap_or(0)
    }

    fn keycode_for(&self, keysym: u32) -> Option<u8> {
        let per = usize::from(self.keysyms_per_keycode.max(1));
        self.keysyms
            .chunks(per)
            .position(|syms| syms.first() == Some(&keysym))
            .map(|offset| self.min_keycode + offset as u8)
    }

    fn key(&self, keycode: u8) -> Key {
        match self.keysym(keycode) {
            XK_ESCAPE => Key::Escape,
            XK_Q => Key::Quit,
            XK_LEFT | XK_KP_LEFT => Key::Left,
            XK_RIGHT | XK_KP_RIGHT => Key::Right,
            XK_UP | XK_KP_UP => Key::Up,
            XK_DOWN | XK_KP_DOWN => Key::Down,
            _ => Key::Other,
        }
    }
}

/// Live X11 connection plus the resources owned by the session: the output
/// window and its graphics context. Both are released on drop.
pub struct X11Display {
    conn: RustConnection,
    root: Window,
    window: Window,
    gc: Gcontext,
    depth: u8,
    bounds: DisplayBounds,
    output_size: u32,
    padding: u32,
    keymap: Keymap,
}

impl X11Display {
    /// Connect to the display named by `$DISPLAY` and create the magnifier
    /// window. Fails fatally when no display is reachable.
    pub fn open(config: &MagnifierConfig) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;

        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let max_keycode = setup.max_keycode;
        let screen = &setup.roots[screen_num];
        let root = screen.root;
        let depth = screen.root_depth;
        let root_visual = screen.root_visual;
        let black_pixel = screen.black_pixel;
        let bounds = DisplayBounds {
            width: screen.width_in_pixels.into(),
            height: screen.height_in_pixels.into(),
        };
        debug!(
            width = bounds.width,
            height = bounds.height,
            depth,
            "connected to display"
        );

        let window_size = config.window_size();
        let window = conn.generate_id()?;
        let win_x = bounds.width as i32 - (window_size as i32 + config.margin);
        let win_y = bounds.height as i32 - (window_size as i32 + config.margin);
        conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            window,
            root,
            win_x as i16,
            win_y as i16,
            window_size as u16,
            window_size as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            root_visual,
            &CreateWindowAux::new().background_pixel(black_pixel).event_mask(
                EventMask::KEY_PRESS
                    | EventMask::EXPOSURE
                    | EventMask::POINTER_MOTION
                    | EventMask::BUTTON_PRESS,
            ),
        )?;

        // min == max pins the window size; the output buffer never resizes.
        let mut hints = WmSizeHints::default();
        hints.min_size = Some((window_size as i32, window_size as i32));
        hints.max_size = Some((window_size as i32, window_size as i32));
        hints.set_normal_hints(&conn, window)?;

        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            WINDOW_TITLE,
        )?;
        conn.map_window(window)?;

        let gc = conn.generate_id()?;
        conn.create_gc(gc, window, &CreateGCAux::new())?;
        conn.flush()?;

        let mapping = conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)?
            .reply()?;
        let keymap = Keymap {
            min_keycode,
            keysyms_per_keycode: mapping.keysyms_per_keycode,
            keysyms: mapping.keysyms,
        };

        let display = Self {
            conn,
            root,
            window,
            gc,
            depth,
            bounds,
            output_size: config.output_size,
            padding: config.padding,
            keymap,
        };
        display.grab_input()?;
        Ok(display)
    }

    /// Try to take the pointer and the quit key. Refusals leave the
    /// magnifier running without an exclusive grab.
    fn grab_input(&self) -> Result<()> {
        let font = self.conn.generate_id()?;
        self.conn.open_font(font, b"cursor")?;
        let cursor = self.conn.generate_id()?;
        self.conn.create_glyph_cursor(
            cursor,
            font,
            font,
            CURSOR_GLYPH,
            CURSOR_GLYPH + 1,
            0,
            0,
            0,
            u16::MAX,
            u16::MAX,
            u16::MAX,
        )?;
        self.conn.close_font(font)?;

        match self
            .conn
            .grab_pointer(
                true,
                self.root,
                EventMask::POINTER_MOTION | EventMask::BUTTON_PRESS,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                cursor,
                x11rb::CURRENT_TIME,
            )?
            .reply()
        {
            Ok(reply) if reply.status == GrabStatus::SUCCESS => {}
            Ok(reply) => {
                warn!(status = ?reply.status, "pointer grab refused, continuing without it");
            }
            Err(ReplyError::ConnectionError(e)) => return Err(e.into()),
            Err(e) => warn!(error = %e, "pointer grab failed, continuing without it"),
        }

        if let Some(keycode) = self.keymap.keycode_for(XK_Q) {
            let cookie = self.conn.grab_key(
                true,
                self.root,
                ModMask::from(0u16),
                keycode,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
            )?;
            if let Err(e) = cookie.check() {
                warn!(error = %e, "quit-key grab refused, continuing without it");
            }
        }
        Ok(())
    }

    fn translate(&self, event: Event) -> Option<InputEvent> {
        match event {
            Event::MotionNotify(e) => Some(InputEvent::PointerMoved {
                x: e.root_x.into(),
                y: e.root_y.into(),
            }),
            Event::KeyPress(e) => Some(InputEvent::KeyPressed(self.keymap.key(e.detail))),
            Event::ButtonPress(e) => Some(InputEvent::ButtonPressed {
                button: e.detail,
                x: e.root_x.into(),
                y: e.root_y.into(),
            }),
            Event::Expose(_) => Some(InputEvent::Exposed),
            _ => None,
        }
    }
}

impl DisplayBackend for X11Display {
    fn bounds(&self) -> DisplayBounds {
        self.bounds
    }

    fn pointer_position(&mut self) -> Result<(i32, i32)> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        Ok((reply.root_x.into(), reply.root_y.into()))
    }

    fn capture_region(&mut self, rect: CaptureRect) -> Result<Snapshot> {
        let cookie = self.conn.get_image(
            ImageFormat::Z_PIXMAP,
            self.root,
            rect.left as i16,
            rect.top as i16,
            rect.size as u16,
            rect.size as u16,
            u32::MAX,
        )?;
        match cookie.reply() {
            Ok(reply) => Ok(Snapshot {
                data: reply.data,
                size: rect.size,
                stride: rect.size as usize * 4,
            }),
            // A rejected rectangle (resolution change mid-flight) is a
            // skipped frame, not the end of the session.
            Err(ReplyError::X11Error(e)) => Err(MagnifierError::Capture(format!(
                "get_image rejected for {}x{} at ({}, {}): {:?}",
                rect.size, rect.size, rect.left, rect.top, e.error_kind
            ))),
            Err(ReplyError::ConnectionError(e)) => Err(e.into()),
        }
    }

    fn present(&mut self, pixels: &[u8]) -> Result<()> {
        self.conn.put_image(
            ImageFormat::Z_PIXMAP,
            self.window,
            self.gc,
            self.output_size as u16,
            self.output_size as u16,
            self.padding as i16,
            self.padding as i16,
            0,
            self.depth,
            pixels,
        )?;
        self.conn.flush()?;
        Ok(())
    }

    fn move_window(&mut self, pos: WindowPosition) -> Result<()> {
        self.conn
            .configure_window(self.window, &ConfigureWindowAux::new().x(pos.x).y(pos.y))?;
        self.conn.flush()?;
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Option<InputEvent>> {
        while let Some(event) = self.conn.poll_for_event()? {
            if let Some(input) = self.translate(event) {
                return Ok(Some(input));
            }
        }
        Ok(None)
    }
}

impl Drop for X11Display {
    fn drop(&mut self) {
        debug!("releasing display resources");
        let _ = self.conn.ungrab_pointer(x11rb::CURRENT_TIME);
        let _ = self.conn.free_gc(self.gc);
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.flush();
    }
}
