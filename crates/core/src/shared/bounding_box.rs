use serde::Serialize;

/// Axis-aligned face rectangle in frame-pixel coordinates.
///
/// `width` and `height` follow the inclusive-pixel convention
/// (`right - left + 1`), so [`BoundingBox::right`] and
/// [`BoundingBox::bottom`] name the last covered column and row.
/// Boxes are not clamped to the frame and may extend past its edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Widened to `i64` so large out-of-frame predictions cannot overflow.
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}
