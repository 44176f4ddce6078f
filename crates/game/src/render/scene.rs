use crate::physics::{WallSide, trace_ray};
use crate::world::World;

use super::color::Color;
use super::framebuffer::{FB_HEIGHT, FB_WIDTH, RenderSink};

/// Casts one ray per column, fills `depth` with squared wall distances and
/// draws ceiling, wall strip and floor.
pub fn draw_walls(world: &World, depth: &mut [f32], alpha: u8, sink: &mut impl RenderSink) {
    let ceiling = Color::Blue.with_alpha(alpha);
    let floor = Color::Black.with_alpha(alpha);

    for (x, column_depth) in depth.iter_mut().enumerate().take(FB_WIDTH) {
        let ray = world.camera.column_ray(x, FB_WIDTH);
        let hit = trace_ray(&world.map, world.camera.position, ray, world.camera.dof);
        *column_depth = hit.distance * hit.distance;

        let (wall_top, wall_height) = if hit.is_wall() {
            let height = ((FB_HEIGHT as f32 / hit.distance) as u32).min(FB_HEIGHT as u32) as usize;
            ((FB_HEIGHT - height) >> 1, height)
        } else {
            (FB_HEIGHT >> 1, 0)
        };
        let wall = match hit.side {
            WallSide::Vertical => Color::White,
            WallSide::Horizontal => Color::LightGray,
        }
        .with_alpha(alpha);

        for y in 0..wall_top {
            sink.set_pixel(x, y, ceiling);
        }
        for y in wall_top..wall_top + wall_height {
            sink.set_pixel(x, y, wall);
        }
        for y in wall_top + wall_height..FB_HEIGHT {
            sink.set_pixel(x, y, floor);
        }
    }
}
