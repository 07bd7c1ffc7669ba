use super::types::{Point2, RayHit, Vec2};
use crate::layers::LayerMask;

/// Ray query collaborator consumed by the resolver and the passenger carrier.
///
/// Implementations must:
/// - return the closest hit within `max_distance` along the unit `direction`,
/// - consider only colliders whose layers intersect `mask`,
/// - report `distance == 0` when `origin` already lies inside a collider.
///
/// A miss is `None`; it is the common case, not an error.
pub trait RayQuery {
    fn cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

impl<Q: RayQuery + ?Sized> RayQuery for &Q {
    #[inline]
    fn cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        (**self).cast(origin, direction, max_distance, mask)
    }
}

/// Angle between a surface normal and the up axis, in degrees.
///
/// 0 is flat floor, 90 a vertical wall. A zero normal (overlap hit) reads as 0.
#[inline]
pub fn slope_angle(normal: Vec2) -> f32 {
    if normal.norm_squared() <= f32::EPSILON {
        return 0.0;
    }
    normal.angle(&Vec2::y()).to_degrees()
}
