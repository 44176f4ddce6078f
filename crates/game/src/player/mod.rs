mod input;
mod state;

pub use input::HeldKeys;
pub use state::Player;

pub const PLAYER_RUN_SPEED: f32 = 3.5;
/// Radians per unit of scaled mouse motion.
pub const PLAYER_ROT_SPEED: f32 = 0.01;
pub const PLAYER_MAX_HEALTH: i32 = 100;
pub const BULLET_DAMAGE: i32 = 25;
