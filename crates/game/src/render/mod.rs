mod camera;
mod color;
mod framebuffer;
mod hud;
mod scene;
mod sprites;

pub use camera::{CAMERA_POS_INTERP, Camera, DEFAULT_DOF, DEFAULT_FOV};
pub use color::{ALPHA_DIMMED, ALPHA_OPAQUE, Color, alpha_mask, invert};
pub use framebuffer::{FB_HEIGHT, FB_WIDTH, Framebuffer, RenderSink};
pub use hud::draw_game_id;
pub use sprites::{ProjectedSprite, collect_visible};

use crate::player::PLAYER_MAX_HEALTH;
use crate::world::World;

/// Frame renderer. Owns the per-column depth buffer and the HUD state that
/// carries across frames.
#[derive(Debug)]
pub struct Renderer {
    depth: Vec<f32>,
    display_health: i32,
    alpha: u8,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            depth: vec![f32::MAX; FB_WIDTH],
            display_health: PLAYER_MAX_HEALTH,
            alpha: ALPHA_OPAQUE,
        }
    }

    /// Alpha byte applied to everything drawn from now on.
    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn reset_health(&mut self, health: i32) {
        self.display_health = health;
    }

    /// Squared wall distance per column from the last frame.
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    pub fn render(&mut self, world: &mut World, sink: &mut impl RenderSink) {
        world.camera.follow(world.player.position);

        scene::draw_walls(world, &mut self.depth, self.alpha, sink);
        let visible = sprites::collect_visible(world);
        sprites::draw_sprites(&visible, &self.depth, self.alpha, sink);

        hud::draw_crosshair(self.alpha, sink);
        hud::draw_health(world.player.health, &mut self.display_health, self.alpha, sink);
        hud::draw_minimap(world, self.alpha, sink);
    }
}
