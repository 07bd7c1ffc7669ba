//! Rider detection for moving platforms.
//!
//! Given a platform's displacement for this tick, finds every body it pushes or carries
//! and the displacement each one needs. The set is rebuilt every tick from scratch.

use rapier2d::parry::utils::hashset::HashSet;

use crate::{
    collision::{
        query::RayQuery,
        ray_fan::RayFan,
        types::{BodyId, RayHit, Vec2},
    },
    layers::LayerMask,
    utils::sign,
};

/// Push computed for one rider this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassengerMovement {
    pub body: BodyId,
    pub displacement: Vec2,
    /// The rider rests on the platform and counts as grounded after its move.
    pub standing_on_platform: bool,
    /// Resolve the rider before the platform translates (pushed riders), or after it
    /// (riders carried on top).
    pub move_before_platform: bool,
}

/// Deduplicated rider list. The first pass to claim a rider wins.
#[derive(Default)]
struct PassengerSet {
    claimed: HashSet<BodyId>,
    movements: Vec<PassengerMovement>,
}

impl PassengerSet {
    fn claim(&mut self, movement: PassengerMovement) {
        if self.claimed.insert(movement.body) {
            self.movements.push(movement);
        }
    }
}

/// Compute the riders affected by a platform moving by `velocity`.
///
/// Three passes, in order:
/// - vertical: rays along the platform's vertical motion from its leading edge,
/// - horizontal: rays along its horizontal motion from its leading side,
/// - top: short upward rays from its top edge when it moves down or purely sideways.
///
/// `fan` is the platform's own ray fan for this tick, `mask` the rider layers.
pub fn compute_passenger_movements<Q: RayQuery + ?Sized>(
    query: &Q,
    fan: &RayFan,
    skin: f32,
    mask: LayerMask,
    velocity: Vec2,
) -> Vec<PassengerMovement> {
    let mut set = PassengerSet::default();
    let dir_x = sign(velocity.x);
    let dir_y = sign(velocity.y);

    let rider = |hit: Option<RayHit>| -> Option<(RayHit, BodyId)> {
        let hit = hit?;
        if hit.distance <= 0.0 {
            return None;
        }
        match hit.body {
            Some(body) => Some((hit, body)),
            None => {
                log::trace!("passenger ray hit a collider without an owning body");
                None
            }
        }
    };

    if velocity.y != 0.0 {
        let ray_length = velocity.y.abs() + skin;
        for i in 0..fan.vertical_count {
            let origin = fan.vertical_origin(dir_y, i);
            let hit = query.cast(origin, Vec2::y() * dir_y, ray_length, mask);
            let Some((hit, body)) = rider(hit) else {
                continue;
            };

            // Only riders lifted from below follow the horizontal motion.
            let push_x = if dir_y > 0.0 { velocity.x } else { 0.0 };
            let push_y = velocity.y - (hit.distance - skin) * dir_y;
            set.claim(PassengerMovement {
                body,
                displacement: Vec2::new(push_x, push_y),
                standing_on_platform: dir_y > 0.0,
                move_before_platform: true,
            });
        }
    }

    if velocity.x != 0.0 {
        let ray_length = velocity.x.abs() + skin;
        for i in 0..fan.horizontal_count {
            let origin = fan.horizontal_origin(dir_x, i);
            let hit = query.cast(origin, Vec2::x() * dir_x, ray_length, mask);
            let Some((hit, body)) = rider(hit) else {
                continue;
            };

            let push_x = velocity.x - (hit.distance - skin) * dir_x;
            set.claim(PassengerMovement {
                body,
                displacement: Vec2::new(push_x, -skin),
                standing_on_platform: false,
                move_before_platform: true,
            });
        }
    }

    if dir_y < 0.0 || (velocity.y == 0.0 && velocity.x != 0.0) {
        let ray_length = 2.0 * skin;
        for i in 0..fan.vertical_count {
            let origin = fan.vertical_origin(1.0, i);
            let hit = query.cast(origin, Vec2::y(), ray_length, mask);
            let Some((_, body)) = rider(hit) else {
                continue;
            };

            set.claim(PassengerMovement {
                body,
                displacement: velocity,
                standing_on_platform: true,
                move_before_platform: false,
            });
        }
    }

    set.movements
}
