use super::types::Vec2;

/// Contact and slope state of one body, produced by every move.
///
/// The contact flags and the current slope are cleared at the start of every move and
/// recomputed; `slope_angle_old`, `move_amount_old`, `face_dir` and the drop-through
/// countdown survive across moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionState {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,

    pub climbing_slope: bool,
    pub descending_slope: bool,
    pub sliding_down_max_slope: bool,

    /// Slope under the body this move, degrees from up.
    pub slope_angle: f32,
    /// Slope under the body on the previous move.
    pub slope_angle_old: f32,
    /// Normal of the contacted slope (zero when none).
    pub slope_normal: Vec2,

    /// The displacement requested by the current move, before any correction.
    pub move_amount_old: Vec2,

    /// -1 facing left, +1 facing right.
    pub face_dir: i8,

    /// One-way platforms are ignored while set.
    pub falling_through_platform: bool,
    /// Seconds until `falling_through_platform` clears.
    pub fall_through_remaining: f32,
}

impl Default for CollisionState {
    fn default() -> Self {
        Self {
            above: false,
            below: false,
            left: false,
            right: false,
            climbing_slope: false,
            descending_slope: false,
            sliding_down_max_slope: false,
            slope_angle: 0.0,
            slope_angle_old: 0.0,
            slope_normal: Vec2::zeros(),
            move_amount_old: Vec2::zeros(),
            face_dir: 1,
            falling_through_platform: false,
            fall_through_remaining: 0.0,
        }
    }
}

impl CollisionState {
    /// Clear per-move flags and roll the current slope into `slope_angle_old`.
    pub fn reset(&mut self) {
        self.above = false;
        self.below = false;
        self.left = false;
        self.right = false;

        self.climbing_slope = false;
        self.descending_slope = false;
        self.sliding_down_max_slope = false;
        self.slope_normal = Vec2::zeros();

        self.slope_angle_old = self.slope_angle;
        self.slope_angle = 0.0;
    }

    /// Start ignoring one-way platforms for `delay` seconds.
    pub fn begin_fall_through(&mut self, delay: f32) {
        self.falling_through_platform = true;
        self.fall_through_remaining = delay.max(0.0);
    }

    /// Advance the drop-through countdown by `dt` seconds.
    ///
    /// Runs once per tick whether or not the body moved.
    pub fn advance_timers(&mut self, dt: f32) {
        if !self.falling_through_platform {
            return;
        }
        self.fall_through_remaining -= dt.max(0.0);
        if self.fall_through_remaining <= 0.0 {
            self.falling_through_platform = false;
            self.fall_through_remaining = 0.0;
            log::trace!("fall-through window closed");
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.below
    }

    /// Touching a wall on either side.
    #[inline]
    pub fn wall_dir(&self) -> Option<i8> {
        match (self.left, self.right) {
            (true, _) => Some(-1),
            (false, true) => Some(1),
            (false, false) => None,
        }
    }
}
