/// Separation kept between a resolved body and the surfaces it touches (world units).
///
/// Ray origins are inset by this amount on every side of the collider bounds, and every
/// clamp subtracts it back out, so a resting body sits exactly on the surface while its
/// rays start slightly inside it.
pub const SKIN_WIDTH: f32 = 0.015;

/// Target distance between two neighbouring rays of a ray fan (world units).
///
/// The actual spacing is derived per axis so the first and last rays land on the corners.
pub const DST_BETWEEN_RAYS: f32 = 0.25;

/// Minimum number of rays along one edge of a ray fan.
pub const MIN_RAY_COUNT: usize = 2;

/// Steepest slope, in degrees from the up axis, a body can walk up or down.
pub const DEFAULT_MAX_SLOPE_ANGLE: f32 = 80.0;

/// How long a body ignores one-way platforms after a deliberate drop-through (seconds).
pub const FALL_THROUGH_RESET_SECONDS: f32 = 0.5;

/// Two slope angles closer than this (degrees) are treated as the same slope.
pub const SLOPE_ANGLE_EPSILON_DEG: f32 = 1.0e-3;

/// Vertical directional intent at or below this value requests a drop-through.
pub const DROP_THROUGH_INTENT: f32 = -0.5;

/// Upper bound for a platform's ease amount. Larger values make the ease curve a step.
pub const MAX_EASE_AMOUNT: f32 = 2.0;

/// Segments shorter than this are treated as already travelled (world units).
pub const MIN_SEGMENT_LENGTH: f32 = 1.0e-6;
