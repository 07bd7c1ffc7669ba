use super::{
    query::{RayQuery, slope_angle},
    ray_fan::RayFan,
    settings::ControllerSettings,
    state::CollisionState,
    types::{Bounds, Point2, RayHit, SurfaceKind, Vec2},
};
use crate::{
    constants::{DROP_THROUGH_INTENT, SLOPE_ANGLE_EPSILON_DEG},
    utils::sign,
};

/// One move attempt for a single body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveRequest {
    /// Desired displacement for this tick (world units).
    pub displacement: Vec2,
    /// Raw directional intent, each axis in `[-1, 1]`. `y == -1` asks to drop through
    /// one-way platforms.
    pub input: Vec2,
    /// The body is carried by a platform this tick and counts as grounded.
    pub standing_on_platform: bool,
}

impl MoveRequest {
    #[inline]
    pub fn new(displacement: Vec2, input: Vec2) -> Self {
        Self {
            displacement,
            input,
            standing_on_platform: false,
        }
    }

    #[inline]
    pub fn carried(displacement: Vec2, standing_on_platform: bool) -> Self {
        Self {
            displacement,
            input: Vec2::zeros(),
            standing_on_platform,
        }
    }
}

/// Result of one move: the corrected displacement and the body's next state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    pub displacement: Vec2,
    pub state: CollisionState,
}

/// Resolve a desired displacement against the obstacle field.
///
/// Pure state transition: given the body's bounds, its settings and its previous state,
/// returns the displacement to apply and the state after the move. The caller applies
/// the displacement to the body's position.
///
/// Algorithm:
/// - Reset contact flags, remember the requested displacement.
/// - Moving down: probe both feet; if exactly one touches ground, descend (or slide down)
///   that slope.
/// - Horizontal sweep from the facing side; the lowest ray detects walkable slopes and
///   climbs them, every other contact clamps.
/// - Vertical sweep offset by the resolved horizontal move; one-way surfaces only block
///   from above and can be dropped through.
/// - While climbing, re-probe at the new height to follow a change of slope mid-move.
pub fn resolve_move<Q: RayQuery + ?Sized>(
    query: &Q,
    bounds: &Bounds,
    settings: &ControllerSettings,
    state: &CollisionState,
    request: MoveRequest,
) -> MoveOutcome {
    let mut sweep = Sweep {
        query,
        fan: RayFan::new(bounds, settings.skin_width, settings.ray_spacing),
        settings,
        state: *state,
        input: request.input,
    };

    let displacement = sweep.run(request);

    MoveOutcome {
        displacement,
        state: sweep.state,
    }
}

/// Working set of a single resolution pass.
struct Sweep<'a, Q: RayQuery + ?Sized> {
    query: &'a Q,
    fan: RayFan,
    settings: &'a ControllerSettings,
    state: CollisionState,
    input: Vec2,
}

impl<Q: RayQuery + ?Sized> Sweep<'_, Q> {
    fn run(&mut self, request: MoveRequest) -> Vec2 {
        let mut m = request.displacement;

        self.state.reset();
        self.state.move_amount_old = m;

        if m.y < 0.0 {
            self.descend_slope(&mut m);
        }

        if m.x != 0.0 {
            self.state.face_dir = sign(m.x) as i8;
        }

        self.horizontal_collisions(&mut m);

        if m.y != 0.0 {
            self.vertical_collisions(&mut m);
        }

        if request.standing_on_platform {
            self.state.below = true;
        }

        m
    }

    #[inline]
    fn cast(&self, origin: Point2, direction: Vec2, length: f32) -> Option<RayHit> {
        self.query
            .cast(origin, direction, length, self.settings.collision_mask)
    }

    #[inline]
    fn skin(&self) -> f32 {
        self.settings.skin_width
    }

    fn horizontal_collisions(&mut self, m: &mut Vec2) {
        let dir_x = self.state.face_dir as f32;
        let skin = self.skin();
        let max_slope = self.settings.max_slope_angle;

        // Always probe at least two skins so walls right next to the body are reported.
        let mut ray_length = if m.x.abs() < skin {
            2.0 * skin
        } else {
            m.x.abs() + skin
        };

        for i in 0..self.fan.horizontal_count {
            let origin = self.fan.horizontal_origin(dir_x, i);
            let Some(hit) = self.cast(origin, Vec2::x() * dir_x, ray_length) else {
                continue;
            };

            // Already overlapping within tolerance; not a stop.
            if hit.distance <= 0.0 {
                continue;
            }

            let angle = slope_angle(hit.normal);

            if i == 0 && angle <= max_slope {
                if self.state.descending_slope {
                    self.state.descending_slope = false;
                    *m = self.state.move_amount_old;
                }

                // New slope: walk flush to its foot before climbing.
                let mut distance_to_slope_start = 0.0;
                if !same_slope(angle, self.state.slope_angle_old) {
                    distance_to_slope_start = hit.distance - skin;
                    m.x -= distance_to_slope_start * dir_x;
                }
                self.climb_slope(m, angle, hit.normal);
                m.x += distance_to_slope_start * dir_x;
            }

            if !self.state.climbing_slope || angle > max_slope {
                m.x = (hit.distance - skin) * dir_x;
                ray_length = hit.distance;

                if self.state.climbing_slope {
                    m.y = self.state.slope_angle.to_radians().tan() * m.x.abs();
                }

                self.state.left = dir_x < 0.0;
                self.state.right = dir_x > 0.0;
            }
        }
    }

    fn vertical_collisions(&mut self, m: &mut Vec2) {
        let dir_y = sign(m.y);
        let skin = self.skin();
        let mut ray_length = m.y.abs() + skin;

        for i in 0..self.fan.vertical_count {
            let origin = self.fan.vertical_origin(dir_y, i) + Vec2::x() * m.x;
            let Some(hit) = self.cast(origin, Vec2::y() * dir_y, ray_length) else {
                continue;
            };

            if hit.surface == SurfaceKind::OneWay && self.passes_one_way(dir_y, &hit) {
                continue;
            }

            m.y = (hit.distance - skin) * dir_y;
            ray_length = hit.distance;

            if self.state.climbing_slope {
                m.x = m.y / self.state.slope_angle.to_radians().tan() * sign(m.x);
            }

            self.state.below = dir_y < 0.0;
            self.state.above = dir_y > 0.0;
        }

        if self.state.climbing_slope {
            let dir_x = sign(m.x);
            let ray_length = m.x.abs() + skin;
            let origin = self.fan.horizontal_origin(dir_x, 0) + Vec2::y() * m.y;

            if let Some(hit) = self.cast(origin, Vec2::x() * dir_x, ray_length) {
                let angle = slope_angle(hit.normal);
                if !same_slope(angle, self.state.slope_angle) {
                    m.x = (hit.distance - skin) * dir_x;
                    self.state.slope_angle = angle;
                    self.state.slope_normal = hit.normal;
                }
            }
        }
    }

    /// Decide whether a vertical ray ignores a one-way surface. May arm a drop-through.
    fn passes_one_way(&mut self, dir_y: f32, hit: &RayHit) -> bool {
        if dir_y > 0.0 || hit.distance <= 0.0 {
            return true;
        }
        if self.state.falling_through_platform {
            return true;
        }
        if self.input.y <= DROP_THROUGH_INTENT {
            self.state.begin_fall_through(self.settings.fall_through_delay);
            log::debug!(
                "drop-through armed for {:.3}s",
                self.settings.fall_through_delay
            );
            return true;
        }
        false
    }

    fn climb_slope(&mut self, m: &mut Vec2, angle: f32, normal: Vec2) {
        let move_distance = m.x.abs();
        let (sin, cos) = angle.to_radians().sin_cos();
        let climb_y = sin * move_distance;

        if m.y <= climb_y {
            m.y = climb_y;
            m.x = cos * move_distance * sign(m.x);
            self.state.below = true;
            self.state.climbing_slope = true;
            self.state.slope_angle = angle;
            self.state.slope_normal = normal;
        }
    }

    fn descend_slope(&mut self, m: &mut Vec2) {
        let length = m.y.abs() + self.skin();
        let left = self.cast(self.fan.bottom_left, -Vec2::y(), length);
        let right = self.cast(self.fan.bottom_right, -Vec2::y(), length);

        // Only one foot on the ground: the body stands at the top of a slope.
        if let (Some(hit), None) | (None, Some(hit)) = (left, right) {
            self.slide_down_max_slope(m, &hit);
            if !self.state.sliding_down_max_slope {
                self.handle_slope_descend(m, &hit);
            }
        }

        if !self.state.below {
            self.state.descending_slope = false;
        }
    }

    fn handle_slope_descend(&mut self, m: &mut Vec2, hit: &RayHit) {
        let angle = slope_angle(hit.normal);
        if angle > self.settings.max_slope_angle {
            return;
        }

        let move_distance = m.x.abs();
        let (sin, cos) = angle.to_radians().sin_cos();
        let descend_y = sin * move_distance;

        if hit.distance < descend_y {
            m.x = cos * move_distance * sign(m.x);
            m.y -= descend_y;
            self.state.slope_angle = angle;
            self.state.below = true;
            self.state.descending_slope = true;
            self.state.slope_normal = hit.normal;
        }
    }

    /// Slopes steeper than the max angle push the body down and away along the slope.
    fn slide_down_max_slope(&mut self, m: &mut Vec2, hit: &RayHit) {
        let angle = slope_angle(hit.normal);
        if angle <= self.settings.max_slope_angle {
            return;
        }

        let fall = (m.y.abs() - hit.distance).max(0.0);
        m.x = sign(hit.normal.x) * fall / angle.to_radians().tan();

        self.state.slope_angle = angle;
        self.state.sliding_down_max_slope = true;
        self.state.slope_normal = hit.normal;
    }
}

#[inline]
fn same_slope(a: f32, b: f32) -> bool {
    (a - b).abs() <= SLOPE_ANGLE_EPSILON_DEG
}

/// A body's resolver together with the state it owns.
///
/// This is the per-body entry point: it holds the settings and the `CollisionState`
/// between moves and applies [`resolve_move`] on each request.
#[derive(Clone, Debug, Default)]
pub struct BodyController {
    pub settings: ControllerSettings,
    state: CollisionState,
}

impl BodyController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            state: CollisionState::default(),
        }
    }

    /// Resolve `request` and keep the resulting state. Returns the displacement to apply.
    pub fn move_body<Q: RayQuery + ?Sized>(
        &mut self,
        query: &Q,
        bounds: &Bounds,
        request: MoveRequest,
    ) -> Vec2 {
        let outcome = resolve_move(query, bounds, &self.settings, &self.state, request);
        self.state = outcome.state;
        outcome.displacement
    }

    /// Per-tick countdowns (drop-through window).
    pub fn advance_timers(&mut self, dt: f32) {
        self.state.advance_timers(dt);
    }

    #[inline]
    pub fn collisions(&self) -> &CollisionState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ObstacleDef, ObstacleWorld};

    const SKIN: f32 = crate::constants::SKIN_WIDTH;
    const EPS: f32 = 1.0e-3;

    /// Floor spanning x in [-20, 20] with its top face at y = 0.
    fn floor() -> ObstacleDef {
        ObstacleDef::ground_box(Vec2::new(0.0, -0.5), Vec2::new(20.0, 0.5))
    }

    /// 1 x 1 body whose bottom-left corner is at `bottom_left`.
    fn body_at(bottom_left: Vec2) -> Bounds {
        Bounds::new(
            Point2::from(bottom_left),
            Point2::from(bottom_left + Vec2::new(1.0, 1.0)),
        )
    }

    fn world(defs: impl IntoIterator<Item = ObstacleDef>) -> ObstacleWorld {
        let mut world = ObstacleWorld::new();
        for def in defs {
            world.insert(def).expect("obstacle");
        }
        world
    }

    fn resolve(
        world: &ObstacleWorld,
        bounds: &Bounds,
        state: &CollisionState,
        request: MoveRequest,
    ) -> MoveOutcome {
        resolve_move(world, bounds, &ControllerSettings::default(), state, request)
    }

    #[test]
    fn lands_on_flat_ground_exactly() {
        let world = world([floor()]);
        let bounds = body_at(Vec2::new(0.0, 0.75));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.0, -2.0), Vec2::zeros()),
        );

        // Ray starts skin above the collider bottom, so measured distance is gap + skin.
        let measured = 0.75 + SKIN;
        assert!((out.displacement.y - -(measured - SKIN)).abs() < EPS);
        assert!(out.state.below);
        assert!(!out.state.descending_slope);
    }

    #[test]
    fn free_fall_without_ground_is_unchanged() {
        let world = world([]);
        let bounds = body_at(Vec2::new(0.0, 5.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.3, -0.5), Vec2::zeros()),
        );

        assert_eq!(out.displacement, Vec2::new(0.3, -0.5));
        assert!(!out.state.below);
        assert_eq!(out.state.face_dir, 1);
    }

    #[test]
    fn wall_clamps_horizontal_move() {
        // Wall face at x = 3.
        let wall = ObstacleDef::ground_box(Vec2::new(3.5, 2.0), Vec2::new(0.5, 2.0));
        let world = world([floor(), wall]);
        let bounds = body_at(Vec2::new(1.5, 0.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(1.0, 0.0), Vec2::zeros()),
        );

        // Collider right edge at 2.5, wall at 3.0.
        assert!((out.displacement.x - 0.5).abs() < EPS);
        assert!(out.state.right);
        assert!(!out.state.left);
    }

    #[test]
    fn face_dir_follows_horizontal_move() {
        let world = world([floor()]);
        let bounds = body_at(Vec2::new(0.0, 0.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(-0.2, 0.0), Vec2::zeros()),
        );
        assert_eq!(out.state.face_dir, -1);

        // No horizontal intent keeps the previous facing.
        let out = resolve(&world, &bounds, &out.state, MoveRequest::default());
        assert_eq!(out.state.face_dir, -1);
    }

    /// 45 degree ramp rising to the right from (2, 0) to (6, 4).
    fn ramp_45() -> ObstacleDef {
        ObstacleDef::ground_triangle(
            Vec2::new(2.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 4.0),
        )
    }

    #[test]
    fn climbs_new_slope_after_reaching_its_foot() {
        let world = world([floor(), ramp_45()]);
        // Collider right edge at 1.5, ramp foot at 2.0.
        let bounds = body_at(Vec2::new(0.5, 0.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(1.0, 0.0), Vec2::zeros()),
        );

        // Horizontal distance from the inset corner to the ramp at y = skin.
        let hit_distance = 0.5 + 2.0 * SKIN;
        let to_foot = hit_distance - SKIN;
        let climb = 1.0 - to_foot;
        let (sin, cos) = 45f32.to_radians().sin_cos();

        assert!(out.state.climbing_slope);
        assert!(out.state.below);
        assert!((out.state.slope_angle - 45.0).abs() < 0.01);
        assert!((out.displacement.x - (to_foot + cos * climb)).abs() < EPS);
        assert!((out.displacement.y - sin * climb).abs() < EPS);
    }

    #[test]
    fn climbing_an_established_slope_follows_it_exactly() {
        let world = world([floor(), ramp_45()]);
        let bounds = body_at(Vec2::new(0.5, 0.0));
        let first = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(1.0, 0.0), Vec2::zeros()),
        );

        let moved = Bounds::new(
            bounds.min + first.displacement,
            bounds.max + first.displacement,
        );
        let out = resolve(
            &world,
            &moved,
            &first.state,
            MoveRequest::new(Vec2::new(0.5, 0.0), Vec2::zeros()),
        );

        let (sin, cos) = 45f32.to_radians().sin_cos();
        assert!(out.state.climbing_slope);
        assert!(out.state.below);
        assert!((out.displacement.x - cos * 0.5).abs() < EPS);
        assert!((out.displacement.y - sin * 0.5).abs() < EPS);
    }

    #[test]
    fn slope_steeper_than_max_is_a_wall() {
        // ~85 degree face rising from (2, 0) to (2.35, 4).
        let cliff = ObstacleDef::ground_triangle(
            Vec2::new(2.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(2.35, 4.0),
        );
        let world = world([floor(), cliff]);
        let bounds = body_at(Vec2::new(0.5, 0.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(1.0, 0.0), Vec2::zeros()),
        );

        assert!(!out.state.climbing_slope);
        assert!(out.state.right);
        assert!(out.displacement.y.abs() < EPS);
        // The lowest ray meets the face barely past its foot.
        assert!(out.displacement.x > 0.45 && out.displacement.x < 0.55);
    }

    #[test]
    fn descends_slope_instead_of_launching_off_it() {
        // Ramp falling to the right from (0, 2) to (4, -2); body stands on its upper part.
        let ramp = ObstacleDef::ground_triangle(
            Vec2::new(0.0, 2.0),
            Vec2::new(0.0, -2.0),
            Vec2::new(4.0, -2.0),
        );
        let world = world([ramp]);
        // Bottom-left corner touches the slope; the right foot hangs over it.
        let bounds = body_at(Vec2::new(1.0, 1.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.5, -0.1), Vec2::zeros()),
        );

        let (sin, cos) = 45f32.to_radians().sin_cos();
        assert!(out.state.descending_slope);
        assert!(out.state.below);
        assert!((out.displacement.x - cos * 0.5).abs() < EPS);
        // The extra fall is clamped by the vertical sweep, keeping the body flush with
        // the slope. The inset foot starts two skins above it.
        assert!((out.displacement.y - -(SKIN + sin * 0.5)).abs() < EPS);
    }

    #[test]
    fn slides_down_slope_steeper_than_max() {
        // ~85 degree face falling to the right from (0, 8) to (0.7, 0).
        let steep = ObstacleDef::ground_triangle(
            Vec2::new(0.0, 8.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.7, 0.0),
        );
        let world = world([steep]);
        let face_y = |x: f32| 8.0 - x * 8.0 / 0.7;
        // Left foot (inset) at x = 0.3 hangs over the face; the right foot is in the air.
        let bounds = body_at(Vec2::new(0.285, 4.8));
        let foot = bounds.min + Vec2::new(SKIN, SKIN);

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.0, -1.0), Vec2::zeros()),
        );

        let tan = 8.0f32 / 0.7;
        let fall = 1.0 - (foot.y - face_y(foot.x));
        assert!(out.state.sliding_down_max_slope);
        assert!(!out.state.descending_slope);
        assert!(out.state.below);
        assert!((out.state.slope_angle - tan.atan().to_degrees()).abs() < 0.01);
        assert!(out.state.slope_normal.x > 0.0);
        assert!((out.displacement.x - fall / tan).abs() < EPS);
        // The foot ends one skin above the face it slid along.
        assert!((out.displacement.y - -(1.0 - SKIN)).abs() < EPS);
    }

    #[test]
    fn climbable_contact_cancels_descend() {
        // Falling 45 degree ramp under the body, rising 45 degree ramp just ahead of it.
        let falling = ObstacleDef::ground_triangle(
            Vec2::new(0.0, 2.0),
            Vec2::new(0.0, -2.0),
            Vec2::new(4.0, -2.0),
        );
        let rising = ObstacleDef::ground_triangle(
            Vec2::new(1.17, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 3.83),
        );
        let world = world([falling, rising]);
        let bounds = body_at(Vec2::new(1.0, 1.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.5, -0.1), Vec2::zeros()),
        );

        // The lowest right ray meets the rising face 0.2 away; the climb starts from the
        // requested move, not from the descend.
        let to_foot = 0.2 - SKIN;
        let climb = 0.5 - to_foot;
        let (sin, cos) = 45f32.to_radians().sin_cos();

        assert!(!out.state.descending_slope);
        assert!(out.state.climbing_slope);
        assert!(out.state.below);
        assert!((out.state.slope_angle - 45.0).abs() < 0.01);
        assert_eq!(out.state.move_amount_old, Vec2::new(0.5, -0.1));
        assert!((out.displacement.x - (to_foot + cos * climb)).abs() < EPS);
        assert!((out.displacement.y - sin * climb).abs() < EPS);
    }

    #[test]
    fn steeper_slope_ahead_is_followed_within_one_move() {
        // 30 degree ramp up to a kink at x = 4, then a 50 degree ramp.
        let (tan30, tan50) = (30f32.to_radians().tan(), 50f32.to_radians().tan());
        let kink_y = 4.0 * tan30;
        let gentle = ObstacleDef::ground_triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, kink_y),
        );
        let steep = ObstacleDef::ground_triangle(
            Vec2::new(4.0, kink_y),
            Vec2::new(8.0, kink_y),
            Vec2::new(8.0, kink_y + 4.0 * tan50),
        );
        let world = world([gentle, steep]);
        let gentle_x = |y: f32| y / tan30;
        let steep_x = |y: f32| 4.0 + (y - kink_y) / tan50;

        // Lowest right ray at y = 2.2, one skin short of the 30 degree face.
        let ray_y = 2.2;
        let bounds = body_at(Vec2::new(gentle_x(ray_y) - 1.0, ray_y - SKIN));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.5, 0.0), Vec2::zeros()),
        );

        // Climbing 30 degrees lifts the lowest ray to y = 2.45, past the kink. Cast again
        // from there, it finds the 50 degree face and the move stops flush against it.
        let climb_y = 30f32.to_radians().sin() * 0.5;
        assert!(out.state.climbing_slope);
        assert!(out.state.below);
        assert!((out.state.slope_angle - 50.0).abs() < 0.01);
        assert!((out.displacement.y - climb_y).abs() < EPS);
        assert!(
            (out.displacement.x - (steep_x(ray_y + climb_y) - gentle_x(ray_y))).abs() < EPS
        );
    }

    #[test]
    fn horizontal_hit_at_zero_distance_is_not_a_wall() {
        // Small box around the body's lower-right ray origin.
        let snag = ObstacleDef::ground_box(Vec2::new(1.0, 0.0), Vec2::new(0.1, 0.1));
        let world = world([snag]);
        let bounds = body_at(Vec2::new(0.0, 0.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.5, 0.0), Vec2::zeros()),
        );

        assert_eq!(out.displacement, Vec2::new(0.5, 0.0));
        assert!(!out.state.right);
        assert!(!out.state.left);
    }

    #[test]
    fn drops_through_one_way_platform_once() {
        let ledge = ObstacleDef::one_way_box(Vec2::new(0.0, -0.1), Vec2::new(5.0, 0.1));
        let world = world([ledge]);
        let bounds = body_at(Vec2::new(0.0, 0.0));
        let settings = ControllerSettings::default();

        // Without intent the ledge holds.
        let held = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.0, -0.1), Vec2::zeros()),
        );
        assert!(held.state.below);
        assert!(held.displacement.y.abs() < EPS);

        // Holding down drops through and arms the window.
        let dropped = resolve(
            &world,
            &bounds,
            &held.state,
            MoveRequest::new(Vec2::new(0.0, -0.1), Vec2::new(0.0, -1.0)),
        );
        assert!((dropped.displacement.y - -0.1).abs() < EPS);
        assert!(dropped.state.falling_through_platform);
        assert_eq!(dropped.state.fall_through_remaining, settings.fall_through_delay);

        // Once the window closes the ledge blocks again.
        let mut state = dropped.state;
        state.advance_timers(settings.fall_through_delay);
        assert!(!state.falling_through_platform);
        let landed = resolve(
            &world,
            &bounds,
            &state,
            MoveRequest::new(Vec2::new(0.0, -0.1), Vec2::zeros()),
        );
        assert!(landed.state.below);
        assert!(landed.displacement.y.abs() < EPS);
    }

    #[test]
    fn one_way_platform_does_not_block_from_below() {
        let ledge = ObstacleDef::one_way_box(Vec2::new(0.0, 2.1), Vec2::new(5.0, 0.1));
        let world = world([ledge]);
        let bounds = body_at(Vec2::new(0.0, 0.5));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.0, 1.0), Vec2::zeros()),
        );

        assert_eq!(out.displacement.y, 1.0);
        assert!(!out.state.above);
    }

    #[test]
    fn ceiling_clamps_upward_move() {
        let ceiling = ObstacleDef::ground_box(Vec2::new(0.0, 3.0), Vec2::new(5.0, 0.5));
        let world = world([ceiling]);
        // Collider top at 2.0, ceiling bottom at 2.5.
        let bounds = body_at(Vec2::new(0.0, 1.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::new(Vec2::new(0.0, 2.0), Vec2::zeros()),
        );

        assert!((out.displacement.y - 0.5).abs() < EPS);
        assert!(out.state.above);
        assert!(!out.state.below);
    }

    #[test]
    fn standing_on_platform_forces_grounded() {
        let world = world([]);
        let bounds = body_at(Vec2::new(0.0, 3.0));

        let out = resolve(
            &world,
            &bounds,
            &CollisionState::default(),
            MoveRequest::carried(Vec2::new(0.0, -0.2), true),
        );

        assert!(out.state.below);
        assert_eq!(out.displacement, Vec2::new(0.0, -0.2));
    }

    #[test]
    fn controller_keeps_state_between_moves() {
        let world = world([floor()]);
        let bounds = body_at(Vec2::new(0.0, 0.5));
        let mut controller = BodyController::default();

        let d = controller.move_body(
            &world,
            &bounds,
            MoveRequest::new(Vec2::new(0.0, -1.0), Vec2::zeros()),
        );

        assert!((d.y - -0.5).abs() < EPS);
        assert!(controller.collisions().is_grounded());
        assert_eq!(controller.collisions().move_amount_old, Vec2::new(0.0, -1.0));
    }
}
