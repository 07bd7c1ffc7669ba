//! Rapier-backed obstacle world used as the ray query and bounds query collaborator.
//!
//! Design goals
//! - Query-only: no dynamics run here. Colliders are free (no parent rigid-body) and are
//!   moved explicitly by the scene when a body or platform translates.
//! - Deterministic: insertion order is the caller's setup order; nothing is reordered.
//! - Fresh: every translation refreshes the broad phase for that collider immediately, so
//!   rays cast later in the same tick see the new position (the passenger carrier relies
//!   on this between its before/after phases).

// Re-export Rapier so downstream crates can build their own colliders without depending
// on `rapier2d` directly.
pub use rapier2d;

use rapier2d::prelude::*;

use crate::{
    collision::{
        query::RayQuery,
        tag::{pack_tag, unpack_body, unpack_layers, unpack_surface, validate_tag},
        types::{BodyId, Bounds, Point2, RayHit, SurfaceKind, Vec2},
    },
    error::SetupError,
    layers::LayerMask,
};

/// Canonical definition of one obstacle collider.
#[derive(Clone, Debug)]
pub struct ObstacleDef {
    /// World-space translation of the shape's local origin.
    pub translation: Vec2,
    /// Collider shape parameters (local space).
    pub shape: ObstacleShape,
    /// Layers the collider belongs to.
    pub layers: LayerMask,
    /// How bodies landing on or moving into it are treated.
    pub surface: SurfaceKind,
    /// Owning kinematic body, if any.
    pub body: Option<BodyId>,
}

impl ObstacleDef {
    /// Solid ground box centered on `center`.
    pub fn ground_box(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            translation: center,
            shape: ObstacleShape::Box { half_extents },
            layers: LayerMask::from_layers(&[crate::layers::Layer::Ground]),
            surface: SurfaceKind::Solid,
            body: None,
        }
    }

    /// Ground triangle given by world-space corners (typically a slope).
    pub fn ground_triangle(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self {
            translation: Vec2::zeros(),
            shape: ObstacleShape::Triangle {
                a: Point2::from(a),
                b: Point2::from(b),
                c: Point2::from(c),
            },
            layers: LayerMask::from_layers(&[crate::layers::Layer::Ground]),
            surface: SurfaceKind::Solid,
            body: None,
        }
    }

    /// One-way ledge: bodies can jump up through it and drop down through it on request.
    pub fn one_way_box(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            surface: SurfaceKind::OneWay,
            ..Self::ground_box(center, half_extents)
        }
    }
}

/// Supported obstacle shapes.
#[derive(Clone, Debug)]
pub enum ObstacleShape {
    /// Axis-aligned box with given half-extents.
    Box { half_extents: Vec2 },
    /// Triangle given by its local-space corners.
    Triangle { a: Point2, b: Point2, c: Point2 },
    /// Convex hull of local-space points.
    ConvexPolygon { points: Vec<Point2> },
}

/// Build a Rapier collider from an `ObstacleDef`.
fn collider_from_def(def: &ObstacleDef) -> Result<Collider, SetupError> {
    let builder = match &def.shape {
        ObstacleShape::Box { half_extents } => {
            if !(half_extents.x > 0.0 && half_extents.y > 0.0) {
                return Err(SetupError::DegenerateShape("box half-extents must be positive"));
            }
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
        }
        ObstacleShape::Triangle { a, b, c } => {
            let area2 = (b - a).perp(&(c - a));
            if area2.abs() <= f32::EPSILON {
                return Err(SetupError::DegenerateShape("triangle corners are collinear"));
            }
            ColliderBuilder::triangle(*a, *b, *c)
        }
        ObstacleShape::ConvexPolygon { points } => ColliderBuilder::convex_hull(points)
            .ok_or(SetupError::DegenerateShape("convex hull of polygon points is empty"))?,
    };

    let tag = pack_tag(def.layers, def.surface, def.body);
    debug_assert_eq!(validate_tag(tag), Ok(()));

    Ok(builder.translation(def.translation).user_data(tag).build())
}

/// In-memory Rapier structures needed for ray queries against the obstacle field.
///
/// - `ColliderSet` holds every obstacle, platform and body collider.
/// - `BroadPhaseBvh` + `NarrowPhase` back a borrowed `QueryPipeline` per cast.
/// - `RigidBodySet` stays empty; it is only required by the query pipeline signature.
pub struct ObstacleWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl Default for ObstacleWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleWorld {
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::default(),
        }
    }

    /// Insert an obstacle and make it visible to queries right away.
    pub fn insert(&mut self, def: ObstacleDef) -> Result<ColliderHandle, SetupError> {
        let collider = collider_from_def(&def)?;
        let handle = self.colliders.insert(collider);
        self.refresh(&[handle]);
        Ok(handle)
    }

    /// Move a collider to an absolute translation.
    pub fn set_translation(&mut self, handle: ColliderHandle, translation: Vec2) {
        let Some(collider) = self.colliders.get_mut(handle) else {
            log::warn!("set_translation on unknown collider {:?}", handle);
            return;
        };
        collider.set_translation(translation);
        self.refresh(&[handle]);
    }

    /// Move a collider by `delta`.
    pub fn translate(&mut self, handle: ColliderHandle, delta: Vec2) {
        let Some(current) = self.colliders.get(handle).map(|c| *c.translation()) else {
            log::warn!("translate on unknown collider {:?}", handle);
            return;
        };
        self.set_translation(handle, current + delta);
    }

    /// Current world-space bounds of a collider (bounds query collaborator).
    pub fn bounds(&self, handle: ColliderHandle) -> Option<Bounds> {
        self.colliders.get(handle).map(|c| {
            let aabb = c.compute_aabb();
            Bounds::new(aabb.mins, aabb.maxs)
        })
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Push the current pose of `modified` colliders into the broad phase.
    fn refresh(&mut self, modified: &[ColliderHandle]) {
        let mut events = Vec::new();
        self.broad_phase.update(
            &IntegrationParameters::default(),
            &self.colliders,
            &self.bodies,
            modified,
            &[],
            &mut events,
        );
    }
}

impl RayQuery for ObstacleWorld {
    fn cast(
        &self,
        origin: Point2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        if !(max_distance > 0.0) {
            return None;
        }

        let in_mask = |_: ColliderHandle, co: &Collider| unpack_layers(co.user_data).intersects(mask);
        let filter = QueryFilter::default().predicate(&in_mask);
        let pipeline = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        );

        // Solid cast: an origin inside a collider reports distance 0.
        let ray = Ray::new(origin, direction);
        let (handle, hit) = pipeline.cast_ray_and_get_normal(&ray, max_distance, true)?;
        let tag = self.colliders.get(handle)?.user_data;

        Some(RayHit {
            distance: hit.time_of_impact,
            normal: hit.normal,
            surface: unpack_surface(tag),
            body: unpack_body(tag),
        })
    }
}
