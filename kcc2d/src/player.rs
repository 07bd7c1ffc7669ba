//! Platformer velocity integration on top of the resolver.
//!
//! `PlayerMotion` turns directional input and jump presses into the per-tick desired
//! displacement and reacts to the `CollisionState` the resolver hands back. A tick is:
//!
//! 1. `begin_tick(dt, collisions)` with the state from the previous move,
//! 2. move the body by the returned displacement,
//! 3. `end_tick(dt, collisions)` with the state from that move.
//!
//! Jump events may arrive between ticks.

use crate::{
    collision::{state::CollisionState, types::Vec2},
    error::SetupError,
    utils::{sign, smooth_damp},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSettings {
    /// Apex height of a held jump.
    pub max_jump_height: f32,
    /// Apex height of a tapped jump.
    pub min_jump_height: f32,
    /// Seconds from take-off to apex of a held jump.
    pub time_to_jump_apex: f32,
    pub acceleration_time_airborne: f32,
    pub acceleration_time_grounded: f32,
    pub move_speed: f32,

    /// Launch velocity when jumping toward the wall being slid on.
    pub wall_jump_climb: Vec2,
    /// Launch velocity when jumping without horizontal input.
    pub wall_jump_off: Vec2,
    /// Launch velocity when jumping away from the wall.
    pub wall_leap: Vec2,
    pub wall_slide_speed_max: f32,
    /// How long input away from the wall is ignored before letting go.
    pub wall_stick_time: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            max_jump_height: 4.0,
            min_jump_height: 1.0,
            time_to_jump_apex: 0.4,
            acceleration_time_airborne: 0.2,
            acceleration_time_grounded: 0.1,
            move_speed: 6.0,
            wall_jump_climb: Vec2::new(7.5, 16.0),
            wall_jump_off: Vec2::new(8.5, 7.0),
            wall_leap: Vec2::new(18.0, 17.0),
            wall_slide_speed_max: 3.0,
            wall_stick_time: 0.25,
        }
    }
}

impl PlayerSettings {
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.time_to_jump_apex > 0.0) {
            return Err(SetupError::InvalidSettings("time_to_jump_apex must be positive"));
        }
        if !(self.min_jump_height >= 0.0 && self.min_jump_height <= self.max_jump_height) {
            return Err(SetupError::InvalidSettings(
                "jump heights must satisfy 0 <= min_jump_height <= max_jump_height",
            ));
        }
        if !(self.move_speed >= 0.0 && self.wall_slide_speed_max >= 0.0) {
            return Err(SetupError::InvalidSettings("speeds must be non-negative"));
        }
        if !(self.wall_stick_time >= 0.0) {
            return Err(SetupError::InvalidSettings("wall_stick_time must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct PlayerMotion {
    pub settings: PlayerSettings,

    gravity: f32,
    max_jump_velocity: f32,
    min_jump_velocity: f32,

    velocity: Vec2,
    velocity_x_smoothing: f32,
    input: Vec2,

    wall_sliding: bool,
    wall_dir_x: i8,
    time_to_wall_unstick: f32,
}

impl PlayerMotion {
    pub fn new(settings: PlayerSettings) -> Result<Self, SetupError> {
        settings.validate()?;

        let gravity = -(2.0 * settings.max_jump_height) / settings.time_to_jump_apex.powi(2);
        let max_jump_velocity = gravity.abs() * settings.time_to_jump_apex;
        let min_jump_velocity = (2.0 * gravity.abs() * settings.min_jump_height).sqrt();
        log::debug!(
            "player motion: gravity {gravity:.3}, jump velocity {min_jump_velocity:.3}..{max_jump_velocity:.3}"
        );

        Ok(Self {
            settings,
            gravity,
            max_jump_velocity,
            min_jump_velocity,
            velocity: Vec2::zeros(),
            velocity_x_smoothing: 0.0,
            input: Vec2::zeros(),
            wall_sliding: false,
            wall_dir_x: 1,
            time_to_wall_unstick: 0.0,
        })
    }

    /// Directional intent, each axis in `[-1, 1]`. Also pass it to the move request so
    /// the resolver sees drop-through intent.
    pub fn set_input(&mut self, input: Vec2) {
        self.input = input;
    }

    #[inline]
    pub fn input(&self) -> Vec2 {
        self.input
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    #[inline]
    pub fn max_jump_velocity(&self) -> f32 {
        self.max_jump_velocity
    }

    #[inline]
    pub fn min_jump_velocity(&self) -> f32 {
        self.min_jump_velocity
    }

    #[inline]
    pub fn is_wall_sliding(&self) -> bool {
        self.wall_sliding
    }

    /// Integrate velocity and return the desired displacement for this tick.
    pub fn begin_tick(&mut self, dt: f32, collisions: &CollisionState) -> Vec2 {
        self.calculate_velocity(dt, collisions);
        self.handle_wall_sliding(dt, collisions);
        self.velocity * dt
    }

    /// React to the state produced by this tick's move.
    pub fn end_tick(&mut self, dt: f32, collisions: &CollisionState) {
        if !(collisions.above || collisions.below) {
            return;
        }
        if collisions.sliding_down_max_slope {
            // Keep accelerating down the slope instead of sticking to it.
            self.velocity.y += collisions.slope_normal.y * -self.gravity * dt;
        } else {
            self.velocity.y = 0.0;
        }
    }

    pub fn jump_pressed(&mut self, collisions: &CollisionState) {
        if self.wall_sliding {
            let wall_dir = self.wall_dir_x as f32;
            let launch = if self.input.x == wall_dir {
                self.settings.wall_jump_climb
            } else if self.input.x == 0.0 {
                self.settings.wall_jump_off
            } else {
                self.settings.wall_leap
            };
            self.velocity = Vec2::new(-wall_dir * launch.x, launch.y);
        }

        if collisions.below {
            if collisions.sliding_down_max_slope {
                // No jumping back up into a slope too steep to stand on.
                if self.input.x != -sign(collisions.slope_normal.x) {
                    self.velocity = collisions.slope_normal * self.max_jump_velocity;
                }
            } else {
                self.velocity.y = self.max_jump_velocity;
            }
        }
    }

    /// Cut a rising jump short.
    pub fn jump_released(&mut self) {
        if self.velocity.y > self.min_jump_velocity {
            self.velocity.y = self.min_jump_velocity;
        }
    }

    fn calculate_velocity(&mut self, dt: f32, collisions: &CollisionState) {
        let target_x = self.input.x * self.settings.move_speed;
        let smooth_time = if collisions.below {
            self.settings.acceleration_time_grounded
        } else {
            self.settings.acceleration_time_airborne
        };
        self.velocity.x = smooth_damp(
            self.velocity.x,
            target_x,
            &mut self.velocity_x_smoothing,
            smooth_time,
            dt,
        );
        self.velocity.y += self.gravity * dt;
    }

    fn handle_wall_sliding(&mut self, dt: f32, collisions: &CollisionState) {
        self.wall_dir_x = collisions.wall_dir().unwrap_or(1);
        self.wall_sliding = false;

        let touching_wall = collisions.wall_dir().is_some();
        if !(touching_wall && !collisions.below && self.velocity.y < 0.0) {
            return;
        }

        self.wall_sliding = true;
        self.velocity.y = self.velocity.y.max(-self.settings.wall_slide_speed_max);

        if self.time_to_wall_unstick > 0.0 {
            self.velocity_x_smoothing = 0.0;
            self.velocity.x = 0.0;

            let wall_dir = self.wall_dir_x as f32;
            if self.input.x != wall_dir && self.input.x != 0.0 {
                self.time_to_wall_unstick -= dt;
            } else {
                self.time_to_wall_unstick = self.settings.wall_stick_time;
            }
        } else {
            self.time_to_wall_unstick = self.settings.wall_stick_time;
        }
    }
}
