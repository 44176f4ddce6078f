use serde::{Deserialize, Serialize};

pub const MIN_DOF: u32 = 8;
pub const MAX_DOF: u32 = 48;
pub const MIN_FOV_DEGREES: f32 = 30.0;
pub const MAX_FOV_DEGREES: f32 = 120.0;
pub const MIN_MOUSE_SENSITIVITY: f32 = 0.1;
pub const MAX_MOUSE_SENSITIVITY: f32 = 2.0;

/// User preferences as normalized slider positions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub draw_distance: f32,
    /// `0.0` is the widest view.
    pub field_of_view: f32,
    pub mouse_sensitivity: f32,
    pub camera_smoothing: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            draw_distance: 0.66,
            field_of_view: 0.5,
            mouse_sensitivity: 0.5,
            camera_smoothing: true,
        }
    }
}

impl Settings {
    /// Clamps every slider back into `[0, 1]`.
    pub fn sanitized(mut self) -> Self {
        for value in [&mut self.draw_distance, &mut self.field_of_view, &mut self.mouse_sensitivity] {
            *value = if value.is_finite() { (*value).clamp(0.0, 1.0) } else { 0.5 };
        }
        self
    }

    pub fn depth_of_field(&self) -> u32 {
        MIN_DOF + ((MAX_DOF - MIN_DOF) as f32 * self.draw_distance) as u32
    }

    pub fn field_of_view_degrees(&self) -> f32 {
        MAX_FOV_DEGREES + (MIN_FOV_DEGREES - MAX_FOV_DEGREES) * self.field_of_view
    }

    pub fn field_of_view_radians(&self) -> f32 {
        self.field_of_view_degrees().to_radians()
    }

    pub fn mouse_sensitivity_scale(&self) -> f32 {
        MIN_MOUSE_SENSITIVITY + (MAX_MOUSE_SENSITIVITY - MIN_MOUSE_SENSITIVITY) * self.mouse_sensitivity
    }
}
