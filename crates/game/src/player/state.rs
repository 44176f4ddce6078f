use glam::Vec2;

use crate::math::{unit_vector, wrap_angle};

use super::PLAYER_MAX_HEALTH;

#[derive(Debug, Clone)]
pub struct Player {
    pub rotation: f32,
    pub position: Vec2,
    /// Unit facing vector, always derived from `rotation`.
    pub direction: Vec2,
    pub health: i32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            rotation: 0.0,
            position: Vec2::ZERO,
            direction: Vec2::X,
            health: PLAYER_MAX_HEALTH,
        }
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.direction = unit_vector(rotation);
    }

    pub fn rotate(&mut self, delta: f32) {
        self.set_rotation(wrap_angle(self.rotation + delta));
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
