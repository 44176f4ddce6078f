use glam::Vec2;

use crate::map::Map;
use crate::player::Player;
use crate::render::Camera;
use crate::settings::Settings;
use crate::sprite::Sprites;

/// Everything the simulation and renderer touch, owned in one place.
#[derive(Debug, Default)]
pub struct World {
    pub map: Map,
    pub player: Player,
    pub camera: Camera,
    pub sprites: Sprites,
}

impl World {
    pub fn new() -> Self {
        Self {
            map: Map::new(),
            player: Player::new(),
            camera: Camera::new(),
            sprites: Sprites::new(),
        }
    }

    /// Sets the player's rotation and keeps the camera basis in step.
    pub fn set_player_rotation(&mut self, rotation: f32) {
        self.player.set_rotation(rotation);
        self.camera.orient(self.player.direction);
    }

    /// Turns the player by `delta` radians, wrapping into `[0, 2π)`.
    pub fn rotate_player(&mut self, delta: f32) {
        self.player.rotate(delta);
        self.camera.orient(self.player.direction);
    }

    /// Places the player and snaps the camera to it.
    pub fn teleport_player(&mut self, position: Vec2, rotation: f32) {
        self.player.position = position;
        self.camera.position = position;
        self.set_player_rotation(rotation);
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.camera.dof = settings.depth_of_field();
        self.camera.smoothing = settings.camera_smoothing;
        self.camera.set_fov(settings.field_of_view_radians());
        self.camera.orient(self.player.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_updates_camera() {
        let mut world = World::new();
        world.set_player_rotation(std::f32::consts::FRAC_PI_2);
        assert!((world.camera.direction().y - 1.0).abs() < 1e-3);
        assert!((world.camera.direction() - world.player.direction).length() < 1e-6);
    }

    #[test]
    fn test_rotate_player_wraps() {
        let mut world = World::new();
        world.set_player_rotation(0.1);
        world.rotate_player(-0.3);
        assert!((world.player.rotation - (std::f32::consts::TAU - 0.2)).abs() < 1e-5);
        assert!((world.camera.direction() - world.player.direction).length() < 1e-6);
    }

    #[test]
    fn test_settings_reach_camera() {
        let mut world = World::new();
        let settings = Settings {
            draw_distance: 1.0,
            camera_smoothing: false,
            ..Settings::default()
        };
        world.apply_settings(&settings);
        assert_eq!(world.camera.dof, 48);
        assert!(!world.camera.smoothing);
    }
}
