//! Axis-aligned rectangles and heading math for the play area.
//!
//! Screen coordinates: x grows right, y grows down. Headings are in degrees,
//! counter-clockwise with y flipped, so 90° points up and 270° points down.

use glam::Vec2;

use crate::consts::{GAME_WIDTH, HEIGHT};

/// Position and extent of anything in the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Vec2, size: (f32, f32)) -> Self {
        Self {
            x: center.x - size.0 / 2.0,
            y: center.y - size.1 / 2.0,
            w: size.0,
            h: size.1,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Midpoint of the bottom edge (bomb muzzle).
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.bottom())
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// `(horizontal, vertical)` containment of `rect` in the play area.
///
/// An axis flag is false when the rectangle pokes out on either side of it.
pub fn in_bounds(rect: &Rect) -> (bool, bool) {
    let horizontal = !(rect.left() < 0.0 || GAME_WIDTH < rect.right());
    let vertical = !(rect.top() < 0.0 || HEIGHT < rect.bottom());
    (horizontal, vertical)
}

/// True when the rectangle is fully inside on both axes.
pub fn fully_inside(rect: &Rect) -> bool {
    in_bounds(rect) == (true, true)
}

/// Unit vector pointing from `from` to `to`; `None` when the points coincide.
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Heading in degrees of a screen-space direction.
pub fn heading_of(dir: Vec2) -> f32 {
    (-dir.y).atan2(dir.x).to_degrees()
}

/// Velocity of magnitude `speed` along `heading` degrees.
pub fn velocity_for(speed: f32, heading: f32) -> Vec2 {
    let radians = heading.to_radians();
    Vec2::new(speed * radians.cos(), -speed * radians.sin())
}

/// Bounding box size of a `w`×`h` box rotated by `degrees`.
pub fn rotated_extent(w: f32, h: f32, degrees: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (
        (w * cos).abs() + (h * sin).abs(),
        (w * sin).abs() + (h * cos).abs(),
    )
}
