//! Frame driver for kinematic bodies and moving platforms.
//!
//! A `Scene` owns the obstacle world, the bodies and the platforms. Setup calls validate
//! their input and fail with [`SetupError`]; once built, a tick never fails.
//!
//! Per tick the caller runs [`Scene::tick`] once and [`Scene::move_body`] for every body
//! that wants to move. `tick` decrements every drop-through countdown, then drives each
//! platform in three strict phases: riders pushed ahead of it, the platform itself, and
//! riders carried on top.

use rapier2d::prelude::ColliderHandle;

use crate::{
    collision::{
        kinematic::{BodyController, MoveRequest},
        ray_fan::RayFan,
        settings::ControllerSettings,
        state::CollisionState,
        types::{BodyId, Bounds, Point2, SurfaceKind, Vec2},
    },
    error::SetupError,
    layers::{Layer, LayerMask},
    platform::{PassengerMovement, PlatformSettings, WaypointPath, compute_passenger_movements},
    world::{ObstacleDef, ObstacleShape, ObstacleWorld},
};

/// Identity of a moving platform inside a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlatformId(pub u32);

/// Setup data for a kinematic body.
#[derive(Clone, Debug)]
pub struct BodyDesc {
    /// Center of the body's box.
    pub position: Point2,
    pub half_extents: Vec2,
    pub settings: ControllerSettings,
    /// Layers the body's own collider is on. Platforms find riders through these.
    pub layers: LayerMask,
}

impl BodyDesc {
    pub fn new(position: Point2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
            settings: ControllerSettings::default(),
            layers: LayerMask::passengers(),
        }
    }
}

/// Setup data for a moving platform.
#[derive(Clone, Debug)]
pub struct PlatformDesc {
    /// Initial center of the platform's box. Waypoints are relative to it.
    pub position: Point2,
    pub half_extents: Vec2,
    pub local_waypoints: Vec<Vec2>,
    pub settings: PlatformSettings,
    pub surface: SurfaceKind,
}

impl PlatformDesc {
    pub fn new(position: Point2, half_extents: Vec2, local_waypoints: Vec<Vec2>) -> Self {
        Self {
            position,
            half_extents,
            local_waypoints,
            settings: PlatformSettings::default(),
            surface: SurfaceKind::Solid,
        }
    }
}

/// A kinematic body: a box moved only through the resolver.
#[derive(Debug)]
pub struct Body {
    id: BodyId,
    position: Point2,
    collider: ColliderHandle,
    controller: BodyController,
}

impl Body {
    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Center of the body's box.
    #[inline]
    pub fn position(&self) -> Point2 {
        self.position
    }

    #[inline]
    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    #[inline]
    pub fn collisions(&self) -> &CollisionState {
        self.controller.collisions()
    }
}

#[derive(Debug)]
struct Platform {
    position: Point2,
    collider: ColliderHandle,
    path: WaypointPath,
    settings: PlatformSettings,
}

#[derive(Default)]
pub struct Scene {
    world: ObstacleWorld,
    bodies: Vec<Body>,
    platforms: Vec<Platform>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add static level geometry.
    pub fn add_obstacle(&mut self, def: ObstacleDef) -> Result<ColliderHandle, SetupError> {
        self.world.insert(def)
    }

    pub fn spawn_body(&mut self, desc: BodyDesc) -> Result<BodyId, SetupError> {
        desc.settings.validate()?;
        check_bounds(desc.position, desc.half_extents, desc.settings.skin_width)?;

        let id = BodyId(self.bodies.len() as u32);
        let collider = self.world.insert(ObstacleDef {
            translation: desc.position.coords,
            shape: ObstacleShape::Box {
                half_extents: desc.half_extents,
            },
            layers: desc.layers,
            surface: SurfaceKind::Solid,
            body: Some(id),
        })?;

        self.bodies.push(Body {
            id,
            position: desc.position,
            collider,
            controller: BodyController::new(desc.settings),
        });
        log::debug!("spawned body {:?} at {:?}", id, desc.position);
        Ok(id)
    }

    pub fn add_platform(&mut self, desc: PlatformDesc) -> Result<PlatformId, SetupError> {
        let path = WaypointPath::new(&desc.local_waypoints, desc.position, &desc.settings)?;
        check_bounds(desc.position, desc.half_extents, desc.settings.skin_width)?;

        let id = PlatformId(self.platforms.len() as u32);
        let collider = self.world.insert(ObstacleDef {
            translation: desc.position.coords,
            shape: ObstacleShape::Box {
                half_extents: desc.half_extents,
            },
            layers: LayerMask::from_layers(&[Layer::Platform]),
            surface: desc.surface,
            body: None,
        })?;

        self.platforms.push(Platform {
            position: desc.position,
            collider,
            path,
            settings: desc.settings,
        });
        log::debug!(
            "added platform {:?} with {} waypoints",
            id,
            desc.local_waypoints.len()
        );
        Ok(id)
    }

    /// Place a body at `position` without resolving collisions.
    pub fn teleport(&mut self, id: BodyId, position: Point2) -> Result<(), SetupError> {
        let body = self
            .bodies
            .get_mut(id.0 as usize)
            .ok_or(SetupError::UnknownBody(id))?;
        body.position = position;
        self.world.set_translation(body.collider, position.coords);
        Ok(())
    }

    /// Advance countdowns and drive every platform by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.controller.advance_timers(dt);
        }
        for index in 0..self.platforms.len() {
            self.drive_platform(index, dt);
        }
    }

    /// Resolve and apply a body's move. Returns the applied displacement, or `None` for
    /// an unknown body.
    pub fn move_body(&mut self, id: BodyId, displacement: Vec2, input: Vec2) -> Option<Vec2> {
        self.resolve_and_apply(id, MoveRequest::new(displacement, input))
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn collisions(&self, id: BodyId) -> Option<&CollisionState> {
        self.body(id).map(Body::collisions)
    }

    /// Current world-space box of a body.
    pub fn body_bounds(&self, id: BodyId) -> Option<Bounds> {
        self.world.bounds(self.body(id)?.collider)
    }

    pub fn platform_position(&self, id: PlatformId) -> Option<Point2> {
        self.platforms.get(id.0 as usize).map(|p| p.position)
    }

    pub fn platform_bounds(&self, id: PlatformId) -> Option<Bounds> {
        self.world.bounds(self.platforms.get(id.0 as usize)?.collider)
    }

    pub fn world(&self) -> &ObstacleWorld {
        &self.world
    }

    fn drive_platform(&mut self, index: usize, dt: f32) {
        let platform = &mut self.platforms[index];
        let velocity = platform.path.tick(dt, platform.position);
        if velocity == Vec2::zeros() {
            return;
        }

        let Some(bounds) = self.world.bounds(platform.collider) else {
            log::warn!("platform {} has no collider; skipping", index);
            return;
        };
        let settings = platform.settings;
        let fan = RayFan::new(&bounds, settings.skin_width, settings.ray_spacing);
        let passengers = compute_passenger_movements(
            &self.world,
            &fan,
            settings.skin_width,
            settings.passenger_mask,
            velocity,
        );

        self.move_passengers(&passengers, true);

        let platform = &mut self.platforms[index];
        platform.position += velocity;
        self.world.translate(platform.collider, velocity);

        self.move_passengers(&passengers, false);
    }

    fn move_passengers(&mut self, passengers: &[PassengerMovement], before_platform: bool) {
        for passenger in passengers
            .iter()
            .filter(|p| p.move_before_platform == before_platform)
        {
            let request =
                MoveRequest::carried(passenger.displacement, passenger.standing_on_platform);
            if self.resolve_and_apply(passenger.body, request).is_none() {
                log::warn!("passenger {:?} is not a body of this scene", passenger.body);
            }
        }
    }

    fn resolve_and_apply(&mut self, id: BodyId, request: MoveRequest) -> Option<Vec2> {
        let body = self.bodies.get_mut(id.0 as usize)?;
        let bounds = self.world.bounds(body.collider)?;

        let displacement = body.controller.move_body(&self.world, &bounds, request);
        body.position += displacement;
        self.world.set_translation(body.collider, body.position.coords);
        Some(displacement)
    }
}

fn check_bounds(center: Point2, half_extents: Vec2, skin: f32) -> Result<(), SetupError> {
    let bounds = Bounds::from_center(center, half_extents);
    if bounds.is_degenerate(skin) {
        let size = bounds.size();
        return Err(SetupError::DegenerateBounds {
            width: size.x,
            height: size.y,
            skin,
        });
    }
    Ok(())
}
