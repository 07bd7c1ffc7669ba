/*!
Collision root module.

This module re-exports submodules that implement the raycast body controller: rectangular
bodies swept through an obstacle field with a fan of rays. The code is split for clarity:

- types:     shared data types (Bounds, RayHit, SurfaceKind, BodyId)
- tag:       packing of layers, surface kind and owning body into collider user data
- settings:  per-body controller tuning
- ray_fan:   ray origins and spacing derived from bounds
- query:     the ray query collaborator trait and slope helpers
- state:     per-body contact and slope state
- kinematic: the slope sweep resolver
*/

pub mod kinematic;
pub mod query;
pub mod ray_fan;
pub mod settings;
pub mod state;
pub mod tag;
pub mod types;

// Re-export commonly used types and functions.
pub use kinematic::{BodyController, MoveOutcome, MoveRequest, resolve_move};
pub use query::{RayQuery, slope_angle};
pub use ray_fan::RayFan;
pub use settings::ControllerSettings;
pub use state::CollisionState;
pub use types::{BodyId, Bounds, Point2, RayHit, SurfaceKind, Vec2};
