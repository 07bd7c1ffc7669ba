/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- the ray fan (ray origins and spacing derived from bounds)
- the ray query collaborator (`RayQuery` implementations such as `ObstacleWorld`)
- the sweep resolver and its `CollisionState`
- the moving-platform passenger carrier
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Point2 = na::Point2<f32>;

/// Identity of a kinematic body inside a [`Scene`](crate::scene::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// How a surface reacts to a body moving into it.
///
/// The numeric values are part of the packed collider tag. Do not reorder.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Blocks from every direction.
    #[default]
    Solid = 0,
    /// Blocks only bodies landing on it from above; can be dropped through on request.
    OneWay = 1,
}

/// World-space axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds {
    #[inline]
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_center(center: Point2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        na::center(&self.min, &self.max)
    }

    /// Grow (positive) or shrink (negative) the box by `amount` on every side.
    ///
    /// Shrinking never inverts the box: an over-shrunk axis collapses onto its center.
    pub fn expanded(&self, amount: f32) -> Self {
        let center = self.center();
        let half = self.size() * 0.5 + Vec2::new(amount, amount);
        let half = Vec2::new(half.x.max(0.0), half.y.max(0.0));
        Self::from_center(center, half)
    }

    /// A box is usable for ray casting once shrunk by `skin` on every side.
    #[inline]
    pub fn is_degenerate(&self, skin: f32) -> bool {
        let size = self.size();
        !(size.x > 2.0 * skin && size.y > 2.0 * skin) || !size.x.is_finite() || !size.y.is_finite()
    }
}

/// A single ray query result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit (0 if the origin is inside the collider).
    pub distance: f32,
    /// World-space surface normal at the hit (zero when `distance == 0`).
    pub normal: Vec2,
    /// Surface classification of the collider that was hit.
    pub surface: SurfaceKind,
    /// Owning body, if the collider belongs to a kinematic body.
    pub body: Option<BodyId>,
}
