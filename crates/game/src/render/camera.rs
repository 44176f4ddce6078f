use glam::{Mat2, Vec2};

use crate::math::{lerp, tan};

/// Weight given to the target when smoothing toward the player.
pub const CAMERA_POS_INTERP: f32 = 0.66;

pub const DEFAULT_DOF: u32 = 34;
pub const DEFAULT_FOV: f32 = 75.0 * std::f32::consts::PI / 180.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec2,
    /// Maximum cells a wall ray may visit.
    pub dof: u32,
    pub smoothing: bool,
    fov: f32,
    plane_half_width: f32,
    direction: Vec2,
    plane: Vec2,
    inverse: Mat2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            dof: DEFAULT_DOF,
            smoothing: true,
            fov: DEFAULT_FOV,
            plane_half_width: 0.0,
            direction: Vec2::X,
            plane: Vec2::ZERO,
            inverse: Mat2::IDENTITY,
        };
        camera.set_fov(DEFAULT_FOV);
        camera
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn plane(&self) -> Vec2 {
        self.plane
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.plane_half_width = 1.0 / (2.0 * tan(fov * 0.5));
        self.orient(self.direction);
    }

    /// Rebuilds the projection plane and the inverse basis for a new facing.
    pub fn orient(&mut self, direction: Vec2) {
        self.direction = direction;
        let perp = direction.perp();
        self.plane = perp * self.plane_half_width;
        // Rows: lateral offset in plane units, then depth along the facing
        self.inverse = Mat2::from_cols(perp / self.plane_half_width, direction).transpose();
    }

    pub fn follow(&mut self, target: Vec2) {
        if self.smoothing {
            self.position = Vec2::new(
                lerp(CAMERA_POS_INTERP, self.position.x, target.x),
                lerp(CAMERA_POS_INTERP, self.position.y, target.y),
            );
        } else {
            self.position = target;
        }
    }

    /// Ray through screen column `column` of a `width`-pixel viewport.
    pub fn column_ray(&self, column: usize, width: usize) -> Vec2 {
        let camera_x = 2.0 * column as f32 / width as f32 - 1.0;
        self.direction + self.plane * camera_x
    }

    /// Camera-space coordinates of `point`: `x` is the lateral offset scaled
    /// so that `x / y` spans `[-1, 1]` across the screen, `y` is depth.
    pub fn project(&self, point: Vec2) -> Vec2 {
        self.inverse * (point - self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_inverts_column_ray() {
        let mut camera = Camera::new();
        camera.smoothing = false;
        camera.orient(Vec2::new(0.6, 0.8));
        camera.follow(Vec2::new(3.0, 2.0));

        let ray = camera.column_ray(480, 640);
        let point = camera.position + ray * 2.5;
        let projected = camera.project(point);
        assert!((projected.y - 2.5).abs() < 1e-4);
        assert!((projected.x / projected.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_behind_camera_has_negative_depth() {
        let mut camera = Camera::new();
        camera.smoothing = false;
        camera.follow(Vec2::new(5.0, 5.0));
        assert!(camera.project(Vec2::new(4.0, 5.0)).y < 0.0);
    }

    #[test]
    fn test_smoothing_moves_part_way() {
        let mut camera = Camera::new();
        camera.follow(Vec2::new(1.0, 0.0));
        assert!((camera.position.x - CAMERA_POS_INTERP).abs() < 1e-6);
    }

    #[test]
    fn test_narrower_fov_widens_plane() {
        let mut camera = Camera::new();
        camera.set_fov(120.0_f32.to_radians());
        let wide = camera.plane().length();
        camera.set_fov(30.0_f32.to_radians());
        assert!(camera.plane().length() > wide);
    }
}
