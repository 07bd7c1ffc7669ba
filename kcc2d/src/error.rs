//! Setup-time errors.
//!
//! Everything here is reported while building a scene, before the first tick. A running
//! tick never fails: missing hits are `None` and degenerate numbers are clamped.

use thiserror::Error;

use crate::collision::types::BodyId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    /// Collider bounds too small to fit a ray fan once shrunk by the skin width.
    #[error("degenerate bounds: size {width}x{height} must exceed twice the skin width {skin}")]
    DegenerateBounds { width: f32, height: f32, skin: f32 },

    /// A platform path needs at least a start and an end.
    #[error("waypoint path needs at least 2 points, got {got}")]
    TooFewWaypoints { got: usize },

    /// A settings value is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    /// An obstacle shape could not be built (e.g. collinear polygon points).
    #[error("degenerate obstacle shape: {0}")]
    DegenerateShape(&'static str),

    /// A body id that the scene never handed out.
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),
}
