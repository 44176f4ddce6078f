use glam::Vec2;

use crate::map::Map;
use crate::math::sign;

use super::raycast::trace_ray;

/// Cells probed along each axis when sweeping a body.
pub const COLLISION_DOF: u32 = 8;

/// Moves a disc of `radius` by `displacement`, one axis at a time, stopping
/// each axis `radius` short of the nearest wall. Both probes start from the
/// position before the move. Returns `true` if either axis was clamped.
pub fn move_and_collide(map: &Map, position: &mut Vec2, displacement: Vec2, radius: f32) -> bool {
    let mut collided = false;

    let step_y = sign(displacement.y);
    let mut dist_y = displacement.y.abs();
    let hit = trace_ray(map, *position, Vec2::new(0.0, step_y), COLLISION_DOF);
    if hit.is_wall() && hit.distance < dist_y + radius {
        dist_y = hit.distance - radius;
        collided = true;
    }

    let step_x = sign(displacement.x);
    let mut dist_x = displacement.x.abs();
    let hit = trace_ray(map, *position, Vec2::new(step_x, 0.0), COLLISION_DOF);
    if hit.is_wall() && hit.distance < dist_x + radius {
        dist_x = hit.distance - radius;
        collided = true;
    }

    position.x += step_x * dist_x;
    position.y += step_y * dist_y;
    collided
}
