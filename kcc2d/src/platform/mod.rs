/*!
Moving platforms.

- path:       waypoint path with easing, waits, cyclic or ping-pong travel
- passengers: rider detection and the push each rider needs this tick

The three-phase order (riders before, platform, riders after) is driven by
[`Scene::tick`](crate::scene::Scene::tick).
*/

pub mod passengers;
pub mod path;

pub use passengers::{PassengerMovement, compute_passenger_movements};
pub use path::{PlatformSettings, WaypointPath, ease};
