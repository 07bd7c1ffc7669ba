use crate::{
    collision::types::{Point2, Vec2},
    constants::{DST_BETWEEN_RAYS, MAX_EASE_AMOUNT, MIN_SEGMENT_LENGTH, SKIN_WIDTH},
    error::SetupError,
    layers::LayerMask,
};

/// Tuning of one moving platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformSettings {
    /// Travel speed along a segment (world units per second).
    pub speed: f32,
    /// Loop back to the first waypoint instead of reversing.
    pub cyclic: bool,
    /// Pause at each waypoint (seconds).
    pub wait_time: f32,
    /// Ease exponent offset in `[0, MAX_EASE_AMOUNT]`; 0 is linear.
    pub ease_amount: f32,
    /// Skin width of the platform's passenger ray fan.
    pub skin_width: f32,
    /// Target spacing of the platform's passenger ray fan.
    pub ray_spacing: f32,
    /// Layers that count as riders.
    pub passenger_mask: LayerMask,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            speed: 3.0,
            cyclic: false,
            wait_time: 0.0,
            ease_amount: 0.0,
            skin_width: SKIN_WIDTH,
            ray_spacing: DST_BETWEEN_RAYS,
            passenger_mask: LayerMask::passengers(),
        }
    }
}

impl PlatformSettings {
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.speed >= 0.0 && self.speed.is_finite()) {
            return Err(SetupError::InvalidSettings("platform speed must be non-negative"));
        }
        if !(self.wait_time >= 0.0 && self.wait_time.is_finite()) {
            return Err(SetupError::InvalidSettings("platform wait_time must be non-negative"));
        }
        if !(0.0..=MAX_EASE_AMOUNT).contains(&self.ease_amount) {
            return Err(SetupError::InvalidSettings("platform ease_amount must be within [0, 2]"));
        }
        if !(self.skin_width > 0.0 && self.skin_width.is_finite()) {
            return Err(SetupError::InvalidSettings("platform skin_width must be positive"));
        }
        if !(self.ray_spacing > 0.0 && self.ray_spacing.is_finite()) {
            return Err(SetupError::InvalidSettings("platform ray_spacing must be positive"));
        }
        Ok(())
    }
}

/// Symmetric ease curve `x^a / (x^a + (1 - x)^a)` with `a = ease_amount + 1`.
///
/// Exact at both endpoints and non-decreasing on `[0, 1]`. Input is clamped to `[0, 1]`.
pub fn ease(x: f32, ease_amount: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    let a = ease_amount.max(0.0) + 1.0;
    let head = x.powf(a);
    head / (head + (1.0 - x).powf(a))
}

/// Waypoint path of one moving platform.
///
/// States: waiting until `next_move_time`, interpolating along the current segment, and
/// arrived (which arms the next wait). Time is the path's own clock, advanced by `tick`.
#[derive(Clone, Debug)]
pub struct WaypointPath {
    points: Vec<Point2>,
    cyclic: bool,
    speed: f32,
    ease_amount: f32,
    wait_time: f32,

    from_index: usize,
    percent: f32,
    clock: f32,
    next_move_time: f32,
}

impl WaypointPath {
    /// Build a path from platform-local points. `origin` is the platform's initial
    /// position; the points are moved to world space once, here.
    pub fn new(
        local_points: &[Vec2],
        origin: Point2,
        settings: &PlatformSettings,
    ) -> Result<Self, SetupError> {
        if local_points.len() < 2 {
            return Err(SetupError::TooFewWaypoints {
                got: local_points.len(),
            });
        }
        settings.validate()?;

        Ok(Self {
            points: local_points.iter().map(|p| origin + *p).collect(),
            cyclic: settings.cyclic,
            speed: settings.speed,
            ease_amount: settings.ease_amount,
            wait_time: settings.wait_time,
            from_index: 0,
            percent: 0.0,
            clock: 0.0,
            next_move_time: 0.0,
        })
    }

    /// Advance the path by `dt` and return the displacement that takes a platform at
    /// `current_position` to its new position on the path.
    pub fn tick(&mut self, dt: f32, current_position: Point2) -> Vec2 {
        self.clock += dt.max(0.0);
        if self.clock < self.next_move_time {
            return Vec2::zeros();
        }

        let len = self.points.len();
        self.from_index %= len;
        let to_index = (self.from_index + 1) % len;
        let from = self.points[self.from_index];
        let to = self.points[to_index];

        let segment = (to - from).norm();
        if segment <= MIN_SEGMENT_LENGTH {
            self.percent = 1.0;
        } else {
            self.percent += dt.max(0.0) * self.speed / segment;
        }
        self.percent = self.percent.clamp(0.0, 1.0);

        let eased = ease(self.percent, self.ease_amount);
        let new_position = from + (to - from) * eased;

        if self.percent >= 1.0 {
            self.arrive();
        }

        new_position - current_position
    }

    fn arrive(&mut self) {
        self.percent = 0.0;
        self.from_index += 1;

        if self.cyclic {
            self.from_index %= self.points.len();
        } else if self.from_index >= self.points.len() - 1 {
            self.from_index = 0;
            self.points.reverse();
            log::trace!("platform path reversed");
        }

        self.next_move_time = self.clock + self.wait_time;
    }

    /// World-space waypoints in current travel order.
    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub fn from_index(&self) -> usize {
        self.from_index
    }

    /// Linear progress along the current segment, in `[0, 1]`.
    #[inline]
    pub fn percent(&self) -> f32 {
        self.percent
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.clock < self.next_move_time
    }
}
