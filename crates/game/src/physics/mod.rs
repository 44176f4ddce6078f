mod collision;
mod raycast;

pub use collision::{COLLISION_DOF, move_and_collide};
pub use raycast::{RayHit, WallSide, trace_ray};
