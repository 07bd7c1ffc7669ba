pub mod camera;
pub mod collision;
pub mod constants;
pub mod error;
pub mod layers;
pub mod platform;
pub mod player;
pub mod scene;
pub mod utils;
pub mod world;

pub use camera::{CameraFollow, CameraSettings, FocusArea};
pub use collision::{
    BodyController, BodyId, Bounds, CollisionState, ControllerSettings, MoveOutcome, MoveRequest,
    Point2, RayFan, RayHit, RayQuery, SurfaceKind, Vec2, resolve_move,
};
pub use constants::{
    DEFAULT_MAX_SLOPE_ANGLE, DST_BETWEEN_RAYS, FALL_THROUGH_RESET_SECONDS, SKIN_WIDTH,
};
pub use error::SetupError;
pub use layers::{Layer, LayerMask};
pub use platform::{PassengerMovement, PlatformSettings, WaypointPath, ease};
pub use player::{PlayerMotion, PlayerSettings};
pub use scene::{Body, BodyDesc, PlatformDesc, PlatformId, Scene};
pub use utils::{sign, smooth_damp};
pub use world::{ObstacleDef, ObstacleShape, ObstacleWorld};
