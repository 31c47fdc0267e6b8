/// Axis-aligned rectangles on the logical play field.

use crate::config::{HEIGHT, WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// A `w`×`h` rectangle anchored at the origin.
    pub fn sized((w, h): (i32, i32)) -> Self {
        Rect { x: 0, y: 0, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn centerx(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn centery(&self) -> i32 {
        self.y + self.h / 2
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    pub fn set_centerx(&mut self, cx: i32) {
        self.x = cx - self.w / 2;
    }

    pub fn set_center(&mut self, (cx, cy): (i32, i32)) {
        self.x = cx - self.w / 2;
        self.y = cy - self.h / 2;
    }

    /// True when the two rectangles share some area.  Touching edges do not
    /// count, and empty rectangles never overlap anything.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Shift horizontally so the rectangle sits inside `[0, width]`.
    pub fn clamp_horizontal(&mut self, width: i32) {
        if self.left() < 0 {
            self.set_left(0);
        }
        if self.right() > width {
            self.set_right(width);
        }
    }
}

/// The whole logical play field.
pub fn play_field() -> Rect {
    Rect::new(0, 0, WIDTH, HEIGHT)
}

/// Horizontal-only bounds check against the play field.
pub fn within_horizontal(rect: &Rect) -> bool {
    rect.left() >= 0 && rect.right() <= WIDTH
}
