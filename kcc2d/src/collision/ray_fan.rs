use super::types::{Bounds, Point2, Vec2};
use crate::constants::MIN_RAY_COUNT;

/// Ray origins and spacing derived from a body's bounds.
///
/// The fan is built from the collider bounds shrunk by the skin width, so every ray starts
/// just inside the collider. Rebuild it every tick from the current bounds; it is a plain
/// value and is never cached across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayFan {
    pub top_left: Point2,
    pub top_right: Point2,
    pub bottom_left: Point2,
    pub bottom_right: Point2,
    /// Rays along the vertical edges (cast horizontally).
    pub horizontal_count: usize,
    /// Rays along the horizontal edges (cast vertically).
    pub vertical_count: usize,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
}

impl RayFan {
    pub fn new(bounds: &Bounds, skin: f32, target_spacing: f32) -> Self {
        let inset = bounds.expanded(-skin);
        let size = inset.size();
        let width = size.x.max(0.0);
        let height = size.y.max(0.0);

        let horizontal_count = ray_count(height, target_spacing);
        let vertical_count = ray_count(width, target_spacing);

        Self {
            top_left: Point2::new(inset.min.x, inset.max.y),
            top_right: Point2::new(inset.max.x, inset.max.y),
            bottom_left: Point2::new(inset.min.x, inset.min.y),
            bottom_right: Point2::new(inset.max.x, inset.min.y),
            horizontal_count,
            vertical_count,
            horizontal_spacing: height / (horizontal_count - 1) as f32,
            vertical_spacing: width / (vertical_count - 1) as f32,
        }
    }

    /// Origin of the `i`-th horizontal ray on the side facing `dir_x`, bottom to top.
    #[inline]
    pub fn horizontal_origin(&self, dir_x: f32, i: usize) -> Point2 {
        let corner = if dir_x < 0.0 {
            self.bottom_left
        } else {
            self.bottom_right
        };
        corner + Vec2::y() * (self.horizontal_spacing * i as f32)
    }

    /// Origin of the `i`-th vertical ray on the edge facing `dir_y`, left to right.
    #[inline]
    pub fn vertical_origin(&self, dir_y: f32, i: usize) -> Point2 {
        let corner = if dir_y < 0.0 {
            self.bottom_left
        } else {
            self.top_left
        };
        corner + Vec2::x() * (self.vertical_spacing * i as f32)
    }
}

/// `round(length / spacing)`, never below [`MIN_RAY_COUNT`].
#[inline]
fn ray_count(length: f32, spacing: f32) -> usize {
    if !(spacing > 0.0) || !length.is_finite() {
        return MIN_RAY_COUNT;
    }
    ((length / spacing).round() as usize).max(MIN_RAY_COUNT)
}
