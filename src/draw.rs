// The window: where finished frames go and where input comes from.
// Visual effects provided here:
// 1) A resizable window that shows the composited frame 1:1.
// 2) The title bar names the image being edited.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

use crate::error::Error;
use crate::geometry::Vec2;
use crate::types::PixelBuffer;
use crate::viewport::PanDirection;

pub const TARGET_FPS: usize = 60;

/// Everything the session needs to know about input for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position in window pixels, if it is over the window.
    pub mouse: Option<Vec2>,
    /// Primary button went down this frame.
    pub pick: bool,
    pub undo: bool,
    pub redo: bool,
    /// Finish this image and move to the next one.
    pub advance: bool,
    /// Finish this image and stop.
    pub quit: bool,
    /// Wheel movement this frame; positive is away from the user.
    pub wheel: f32,
    /// Pan keys currently held.
    pub pan: Vec<PanDirection>,
}

/// A place frames are shown and input is read from.
pub trait Surface {
    /// False once the user closed the window.
    fn is_open(&self) -> bool;
    /// Current drawable size in pixels.
    fn size(&self) -> (usize, usize);
    fn poll_input(&mut self) -> FrameInput;
    fn set_title(&mut self, title: &str);
    /// Show `frame`. Its size should match `size()`.
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), Error>;
}

pub struct Drawer {
    window: Window,      // the on-screen window you see
    packed: Vec<u32>,    // frame repacked as 0x00RRGGBB for minifb
    title: String,
    mouse_was_down: bool, // minifb only reports button state; we want the press edge
}

impl Drawer {
    /// Create a resizable window. The frame is blitted 1:1 from the top-left.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::UpperLeft,
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, width.max(1), height.max(1), options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(TARGET_FPS);
        Ok(Self { window, packed: Vec::new(), title: title.to_string(), mouse_was_down: false })
    }

    fn key_down(&self, key: Key) -> bool {
        self.window.is_key_down(key)
    }

    fn key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    fn ctrl_down(&self) -> bool {
        self.key_down(Key::LeftCtrl) || self.key_down(Key::RightCtrl)
    }
}

impl Surface for Drawer {
    fn is_open(&self) -> bool {
        self.window.is_open()
    }

    fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    fn poll_input(&mut self) -> FrameInput {
        let mouse = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| Vec2::new(x, y));

        let down = self.window.get_mouse_down(MouseButton::Left);
        let pick = down && !self.mouse_was_down;
        self.mouse_was_down = down;

        let wheel = self.window.get_scroll_wheel().map(|(_, dy)| dy).unwrap_or(0.0);

        let held = [
            (PanDirection::Up, [Key::Up, Key::W]),
            (PanDirection::Down, [Key::Down, Key::S]),
            (PanDirection::Left, [Key::Left, Key::A]),
            (PanDirection::Right, [Key::Right, Key::D]),
        ];
        let pan = held
            .into_iter()
            .filter(|(_, keys)| keys.iter().any(|k| self.key_down(*k)))
            .map(|(dir, _)| dir)
            .collect();

        let ctrl = self.ctrl_down();
        FrameInput {
            mouse,
            pick,
            undo: self.key_pressed(Key::U) || (ctrl && self.key_pressed(Key::Z)),
            redo: self.key_pressed(Key::R) || (ctrl && self.key_pressed(Key::Y)),
            advance: self.key_pressed(Key::Enter) || self.key_pressed(Key::N),
            quit: self.key_pressed(Key::Escape),
            wheel,
            pan,
        }
    }

    fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.window.set_title(title);
            self.title = title.to_string();
        }
    }

    /// Push the pixels for this frame to the screen.
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), Error> {
        // A minimized window has no area; keep pumping events without a blit.
        if frame.is_empty() {
            self.window.update();
            return Ok(());
        }
        self.packed.clear();
        self.packed.extend(frame.pixels().iter().map(|c| c.to_0rgb()));
        self.window
            .update_with_buffer(&self.packed, frame.width(), frame.height())
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}
