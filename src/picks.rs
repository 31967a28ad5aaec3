// The list of picked corners for the current image, with undo/redo.
//
// Points live in image space. Consecutive pairs below the cursor form the
// committed rectangles; an odd cursor leaves one pending first corner.

use crate::geometry::{Rect, Vec2, hull};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickStack {
    items: Vec<Vec2>, // items[cursor..] is the redo tail
    cursor: usize,
}

impl PickStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pick. Anything that could have been redone is discarded.
    pub fn push(&mut self, p: Vec2) {
        self.items.truncate(self.cursor);
        self.items.push(p);
        self.cursor += 1;
    }

    /// Step back one pick. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Re-apply the last undone pick. Returns false at the end of history.
    pub fn redo(&mut self) -> bool {
        if self.cursor == self.items.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    /// Number of stored picks, redo tail included.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Picks that are currently in effect.
    pub fn active(&self) -> &[Vec2] {
        &self.items[..self.cursor]
    }

    #[cfg(test)]
    pub fn items(&self) -> &[Vec2] {
        &self.items
    }

    /// Complete rectangles, in pick order.
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.active().chunks_exact(2).map(|pair| hull(pair[0], pair[1]))
    }

    /// The first corner of a rectangle still waiting for its second click.
    pub fn pending(&self) -> Option<Vec2> {
        if self.cursor % 2 == 1 {
            self.items.get(self.cursor - 1).copied()
        } else {
            None
        }
    }
}
