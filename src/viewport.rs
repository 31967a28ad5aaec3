// Which part of the image is on screen, and how it moves.
//
// `part` is a sub-rectangle of the image (image space). Every frame it is
// letterboxed into the window with `fit`; the pair (display rect, part)
// defines the screen <-> image mapping.

use crate::geometry::{Rect, Vec2};

/// Fraction of the visible extent removed per wheel step.
pub const ZOOM_STEP: f32 = 0.1;
/// Fraction of the visible extent moved per frame while a pan key is held.
pub const PAN_STEP: f32 = 0.02;
/// Smallest visible extent, in image pixels, on either axis.
pub const MIN_PART_EXTENT: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    full: Rect,
    part: Rect,
}

impl Viewport {
    /// Start with the whole image visible.
    pub fn new(width: usize, height: usize) -> Self {
        let full = Rect::new(0.0, 0.0, width as f32, height as f32);
        Self { full, part: full }
    }

    pub fn full(&self) -> Rect {
        self.full
    }

    pub fn part(&self) -> Rect {
        self.part
    }

    /// Where the visible part is drawn inside `screen` this frame.
    pub fn display_rect(&self, screen: Rect) -> Rect {
        screen.fit(self.part.width / self.part.height)
    }

    /// Map "screen -> image". None while the window has no area.
    pub fn screen_to_image_map(&self, screen: Rect) -> Option<Rect> {
        let to_unit = self.display_rect(screen).invert()?;
        Some(to_unit.compose(&self.part))
    }

    /// Map "image -> screen". None while the window has no area.
    pub fn image_to_screen_map(&self, screen: Rect) -> Option<Rect> {
        let display = self.display_rect(screen);
        if display.is_empty() {
            return None;
        }
        Some(self.part.invert()?.compose(&display))
    }

    pub fn screen_to_image(&self, screen: Rect, p: Vec2) -> Option<Vec2> {
        self.screen_to_image_map(screen).map(|m| m.transform(p))
    }

    #[cfg(test)]
    pub fn image_to_screen(&self, screen: Rect, p: Vec2) -> Option<Vec2> {
        self.image_to_screen_map(screen).map(|m| m.transform(p))
    }

    /// Zoom by `steps` wheel notches around the screen point `cursor`.
    /// Positive steps zoom in. The image point under the cursor stays put
    /// unless the result has to be clamped to the image.
    pub fn zoom(&mut self, screen: Rect, cursor: Vec2, steps: f32) {
        let mut s = 1.0 - ZOOM_STEP * steps;
        debug_assert!(s > 0.0, "zoom: {steps} steps is too many");
        if s <= 0.0 {
            return;
        }

        // Never shrink below the minimum extent (or the image, if smaller).
        let min_w = MIN_PART_EXTENT.min(self.full.width);
        let min_h = MIN_PART_EXTENT.min(self.full.height);
        let floor = (min_w / self.part.width).max(min_h / self.part.height);
        if s < floor {
            s = floor.min(1.0);
        }

        let Some(to_unit) = self.display_rect(screen).invert() else {
            return;
        };
        let m = to_unit.transform(cursor);
        let (mx, my) = (m.x.clamp(0.0, 1.0), m.y.clamp(0.0, 1.0));

        self.part.x += mx * self.part.width * (1.0 - s);
        self.part.y += my * self.part.height * (1.0 - s);
        self.part.width *= s;
        self.part.height *= s;
        self.part = self.part.intersect(&self.full);
        debug_assert!(!self.part.is_empty());
    }

    /// Move the visible part one step, staying inside the image.
    pub fn pan(&mut self, direction: PanDirection) {
        let dx = PAN_STEP * self.part.width;
        let dy = PAN_STEP * self.part.height;
        match direction {
            PanDirection::Up => self.part.y -= dy,
            PanDirection::Down => self.part.y += dy,
            PanDirection::Left => self.part.x -= dx,
            PanDirection::Right => self.part.x += dx,
        }
        self.part.x = self.part.x.clamp(0.0, (self.full.width - self.part.width).max(0.0));
        self.part.y = self.part.y.clamp(0.0, (self.full.height - self.part.height).max(0.0));
    }
}
