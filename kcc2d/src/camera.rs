use crate::{
    collision::types::{Bounds, Point2, Vec2},
    error::SetupError,
    utils::{sign, smooth_damp},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    /// Added to the focus centre on the y axis.
    pub vertical_offset: f32,
    /// How far ahead of the target the camera looks when it moves sideways.
    pub look_ahead_dst_x: f32,
    pub look_smooth_time_x: f32,
    pub vertical_smooth_time: f32,
    /// Size of the box the target may move in without moving the camera.
    pub focus_area_size: Vec2,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            vertical_offset: 1.0,
            look_ahead_dst_x: 4.0,
            look_smooth_time_x: 0.5,
            vertical_smooth_time: 0.2,
            focus_area_size: Vec2::new(3.0, 5.0),
        }
    }
}

impl CameraSettings {
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.focus_area_size.x >= 0.0 && self.focus_area_size.y >= 0.0) {
            return Err(SetupError::InvalidSettings("focus_area_size must be non-negative"));
        }
        if !(self.look_smooth_time_x >= 0.0 && self.vertical_smooth_time >= 0.0) {
            return Err(SetupError::InvalidSettings("smooth times must be non-negative"));
        }
        Ok(())
    }
}

/// Box the target can move in freely. Pushed along when the target leaves it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusArea {
    pub centre: Point2,
    /// Shift applied by the last update.
    pub velocity: Vec2,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl FocusArea {
    /// Centred on the target horizontally, with the target standing on its bottom edge.
    pub fn new(target: &Bounds, size: Vec2) -> Self {
        let centre_x = target.center().x;
        let left = centre_x - size.x / 2.0;
        let right = centre_x + size.x / 2.0;
        let bottom = target.min.y;
        let top = target.min.y + size.y;

        Self {
            centre: Point2::new((left + right) / 2.0, (top + bottom) / 2.0),
            velocity: Vec2::zeros(),
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn update(&mut self, target: &Bounds) {
        let shift_x = if target.min.x < self.left {
            target.min.x - self.left
        } else if target.max.x > self.right {
            target.max.x - self.right
        } else {
            0.0
        };
        self.left += shift_x;
        self.right += shift_x;

        let shift_y = if target.min.y < self.bottom {
            target.min.y - self.bottom
        } else if target.max.y > self.top {
            target.max.y - self.top
        } else {
            0.0
        };
        self.top += shift_y;
        self.bottom += shift_y;

        self.centre = Point2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        );
        self.velocity = Vec2::new(shift_x, shift_y);
    }
}

/// Side-scroller camera: focus area, horizontal look-ahead and vertical smoothing.
#[derive(Clone, Debug)]
pub struct CameraFollow {
    pub settings: CameraSettings,
    focus_area: FocusArea,
    position: Point2,

    current_look_ahead_x: f32,
    target_look_ahead_x: f32,
    look_ahead_dir_x: f32,
    smooth_look_velocity_x: f32,
    smooth_velocity_y: f32,
    look_ahead_stopped: bool,
}

impl CameraFollow {
    pub fn new(target: &Bounds, settings: CameraSettings) -> Result<Self, SetupError> {
        settings.validate()?;
        let focus_area = FocusArea::new(target, settings.focus_area_size);

        Ok(Self {
            settings,
            focus_area,
            position: focus_area.centre + Vec2::y() * settings.vertical_offset,
            current_look_ahead_x: 0.0,
            target_look_ahead_x: 0.0,
            look_ahead_dir_x: 0.0,
            smooth_look_velocity_x: 0.0,
            smooth_velocity_y: 0.0,
            look_ahead_stopped: false,
        })
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        self.position
    }

    #[inline]
    pub fn focus_area(&self) -> &FocusArea {
        &self.focus_area
    }

    #[inline]
    pub fn look_ahead_x(&self) -> f32 {
        self.current_look_ahead_x
    }

    /// Follow `target` for one frame. `input_x` is the target's horizontal intent.
    pub fn update(&mut self, dt: f32, target: &Bounds, input_x: f32) -> Point2 {
        self.focus_area.update(target);
        let mut focus = self.focus_area.centre + Vec2::y() * self.settings.vertical_offset;

        let shift_x = self.focus_area.velocity.x;
        if shift_x != 0.0 {
            self.look_ahead_dir_x = sign(shift_x);
            let full = self.look_ahead_dir_x * self.settings.look_ahead_dst_x;

            if input_x != 0.0 && sign(input_x) == sign(shift_x) {
                self.look_ahead_stopped = false;
                self.target_look_ahead_x = full;
            } else if !self.look_ahead_stopped {
                // Target stopped pushing: ease out a quarter of the remaining way.
                self.look_ahead_stopped = true;
                self.target_look_ahead_x =
                    self.current_look_ahead_x + (full - self.current_look_ahead_x) / 4.0;
            }
        }

        self.current_look_ahead_x = smooth_damp(
            self.current_look_ahead_x,
            self.target_look_ahead_x,
            &mut self.smooth_look_velocity_x,
            self.settings.look_smooth_time_x,
            dt,
        );
        focus.y = smooth_damp(
            self.position.y,
            focus.y,
            &mut self.smooth_velocity_y,
            self.settings.vertical_smooth_time,
            dt,
        );
        focus.x += self.current_look_ahead_x;

        self.position = focus;
        focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn target_at(x: f32, y: f32) -> Bounds {
        Bounds::new(Point2::new(x - 0.5, y), Point2::new(x + 0.5, y + 2.0))
    }

    #[test]
    fn focus_area_starts_under_target() {
        let area = FocusArea::new(&target_at(0.0, 0.0), Vec2::new(3.0, 5.0));
        assert_eq!(area.centre, Point2::new(0.0, 2.5));
        assert_eq!(area.velocity, Vec2::zeros());
    }

    #[test]
    fn focus_area_ignores_moves_inside_it() {
        let mut area = FocusArea::new(&target_at(0.0, 0.0), Vec2::new(3.0, 5.0));
        area.update(&target_at(0.75, 1.0));
        assert_eq!(area.velocity, Vec2::zeros());
        assert_eq!(area.centre, Point2::new(0.0, 2.5));
    }

    #[test]
    fn focus_area_is_pushed_by_overshoot() {
        let mut area = FocusArea::new(&target_at(0.0, 0.0), Vec2::new(3.0, 5.0));
        // Right edge of the area is at 1.5; the target's right side reaches 2.5.
        area.update(&target_at(2.0, -1.0));
        assert_eq!(area.velocity, Vec2::new(1.0, -1.0));
        assert_eq!(area.centre, Point2::new(1.0, 1.5));
    }

    #[test]
    fn looks_ahead_while_pushing_and_eases_off_after() {
        let mut camera =
            CameraFollow::new(&target_at(0.0, 0.0), CameraSettings::default()).expect("camera");

        let mut x = 0.0;
        for _ in 0..120 {
            x += 0.1;
            camera.update(DT, &target_at(x, 0.0), 1.0);
        }
        let full = camera.settings.look_ahead_dst_x;
        assert!(camera.look_ahead_x() > 0.9 * full);

        // Still drifting right but no input: target only a quarter of the way further.
        let before = camera.look_ahead_x();
        x += 0.1;
        camera.update(DT, &target_at(x, 0.0), 0.0);
        assert!(camera.look_ahead_x() <= before + (full - before) / 4.0 + 1.0e-4);
    }

    #[test]
    fn vertical_follow_is_smoothed() {
        let settings = CameraSettings::default();
        let mut camera = CameraFollow::new(&target_at(0.0, 0.0), settings).expect("camera");
        let start = camera.position().y;

        // Jump well above the focus area.
        let high = target_at(0.0, 10.0);
        let first = camera.update(DT, &high, 0.0);
        assert!(first.y > start);

        let goal = camera.focus_area().centre.y + settings.vertical_offset;
        assert!(first.y < goal);

        for _ in 0..300 {
            camera.update(DT, &high, 0.0);
        }
        assert!((camera.position().y - goal).abs() < 1.0e-3);
    }
}
