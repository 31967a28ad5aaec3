// Rectangles and the one transform kind we need.
//
// A `Rect` doubles as an axis-aligned affine map: it sends the unit square
// [0,1]x[0,1] onto itself, i.e. (x, y) -> (width*x + rect.x, height*y + rect.y).
// Screen <-> image conversions are built by composing and inverting these.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned bounding rectangle of two points, in either order.
pub fn hull(a: Vec2, b: Vec2) -> Rect {
    Rect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (b.x - a.x).abs(),
        height: (b.y - a.y).abs(),
    }
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the rectangle covers no area (zero or negative extent).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Largest rectangle with `width / height == aspect` that fits inside
    /// `self`, centered. Used to letterbox the visible part into the window.
    pub fn fit(&self, aspect: f32) -> Rect {
        debug_assert!(aspect > 0.0, "fit: aspect must be positive, got {aspect}");
        let (width, height) = if self.width > self.height * aspect {
            (self.height * aspect, self.height)
        } else {
            (self.width, self.width / aspect)
        };
        Rect {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }

    /// Overlap of two rectangles. Disjoint inputs give a negative extent,
    /// which callers check with `is_empty`.
    pub fn intersect(&self, other: &Rect) -> Rect {
        debug_assert!(self.width >= 0.0 && self.height >= 0.0);
        debug_assert!(other.width >= 0.0 && other.height >= 0.0);
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Rect {
            x,
            y,
            width: self.right().min(other.right()) - x,
            height: self.bottom().min(other.bottom()) - y,
        }
    }

    /// Apply the map to a point.
    #[inline]
    pub fn transform(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: self.width * p.x + self.x,
            y: self.height * p.y + self.y,
        }
    }

    /// The map "`self`, then `next`".
    pub fn compose(&self, next: &Rect) -> Rect {
        Rect {
            x: next.width * self.x + next.x,
            y: next.height * self.y + next.y,
            width: next.width * self.width,
            height: next.height * self.height,
        }
    }

    /// Inverse map, or None for a degenerate (zero-extent) rectangle.
    pub fn invert(&self) -> Option<Rect> {
        if self.width == 0.0 || self.height == 0.0 {
            return None;
        }
        Some(Rect {
            x: -self.x / self.width,
            y: -self.y / self.height,
            width: 1.0 / self.width,
            height: 1.0 / self.height,
        })
    }

    /// Image of a whole rectangle under this map.
    pub fn transform_rect(&self, r: &Rect) -> Rect {
        hull(
            self.transform(Vec2::new(r.x, r.y)),
            self.transform(Vec2::new(r.right(), r.bottom())),
        )
    }

    /// Nearest point inside the rectangle.
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: p.x.clamp(self.x, self.right().max(self.x)),
            y: p.y.clamp(self.y, self.bottom().max(self.y)),
        }
    }
}
