/*!
Per-body controller settings.

Defaults come from [`crate::constants`]. Keep them as sensible defaults and override from
game data where a body needs different tuning (a heavier enemy with a lower max slope,
a crate with a coarser ray fan).

Notes
- Distances are world units, angles degrees, time seconds.
- Settings are validated once at setup; a tick never sees invalid settings.
*/

use crate::{
    constants::{DEFAULT_MAX_SLOPE_ANGLE, DST_BETWEEN_RAYS, FALL_THROUGH_RESET_SECONDS, SKIN_WIDTH},
    error::SetupError,
    layers::LayerMask,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerSettings {
    /// Clearance kept between the body and contacted surfaces.
    pub skin_width: f32,
    /// Target distance between neighbouring rays of the body's ray fan.
    pub ray_spacing: f32,
    /// Steepest walkable slope, degrees from the up axis, in `[0, 90]`.
    pub max_slope_angle: f32,
    /// How long one-way platforms are ignored after a drop-through request.
    pub fall_through_delay: f32,
    /// Layers this body collides with.
    pub collision_mask: LayerMask,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            skin_width: SKIN_WIDTH,
            ray_spacing: DST_BETWEEN_RAYS,
            max_slope_angle: DEFAULT_MAX_SLOPE_ANGLE,
            fall_through_delay: FALL_THROUGH_RESET_SECONDS,
            collision_mask: LayerMask::obstacles(),
        }
    }
}

impl ControllerSettings {
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.skin_width > 0.0 && self.skin_width.is_finite()) {
            return Err(SetupError::InvalidSettings("skin_width must be positive"));
        }
        if !(self.ray_spacing > 0.0 && self.ray_spacing.is_finite()) {
            return Err(SetupError::InvalidSettings("ray_spacing must be positive"));
        }
        if !(0.0..=90.0).contains(&self.max_slope_angle) {
            return Err(SetupError::InvalidSettings(
                "max_slope_angle must be within [0, 90] degrees",
            ));
        }
        if !(self.fall_through_delay >= 0.0 && self.fall_through_delay.is_finite()) {
            return Err(SetupError::InvalidSettings(
                "fall_through_delay must be non-negative",
            ));
        }
        if self.collision_mask.is_empty() {
            log::warn!("Controller collision mask is empty; the body will pass through everything");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ControllerSettings::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_skin() {
        let settings = ControllerSettings {
            skin_width: 0.0,
            ..ControllerSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SetupError::InvalidSettings(_))
        ));
    }

    #[test]
    fn rejects_slope_outside_quarter_turn() {
        let settings = ControllerSettings {
            max_slope_angle: 95.0,
            ..ControllerSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
