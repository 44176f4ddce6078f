use std::f32::consts::{PI, TAU};

use crate::math::{fast_normalize, sign};
use crate::sprite::{IDLE_FRAME, Sprite, SpriteType};
use crate::world::World;

use super::color::Color;
use super::framebuffer::{FB_HEIGHT, FB_WIDTH, RenderSink};

/// Extra lift applied to bullets so they float at muzzle height.
const BULLET_SCREEN_OFFSET: f32 = 128.0;

const FACING_STEPS: f32 = 8.0;

/// Screen-space extents are clamped to this many pixels so sums stay in `i32`.
const MAX_SPAN: f32 = 65536.0;

#[inline]
fn to_pixels(value: f32) -> i32 {
    value.clamp(-MAX_SPAN, MAX_SPAN) as i32
}

/// Per-frame projection of a sprite. Lives only for the draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSprite {
    pub id: u8,
    pub kind: SpriteType,
    pub screen_x: i32,
    pub half_width: i32,
    pub inv_depth: f32,
    pub depth2: f32,
    /// Player sprites only: angle between the sprite and the viewer.
    pub relative_rotation: f32,
    pub rotation: f32,
    pub anim_frame: f32,
}

/// Projects every drawable sprite and returns them sorted far to near.
pub fn collect_visible(world: &World) -> Vec<ProjectedSprite> {
    let tracked = world.sprites.tracked_id();
    let mut visible: Vec<ProjectedSprite> = Vec::with_capacity(world.sprites.len());

    for sprite in world.sprites.iter() {
        if sprite.disabled || Some(sprite.id) == tracked {
            continue;
        }
        let Some(projected) = project(world, sprite) else {
            continue;
        };
        let index = visible
            .iter()
            .position(|other| other.depth2 < projected.depth2)
            .unwrap_or(visible.len());
        visible.insert(index, projected);
    }
    visible
}

fn project(world: &World, sprite: &Sprite) -> Option<ProjectedSprite> {
    let camera = &world.camera;
    let proj = camera.project(sprite.position);
    if proj.y <= 0.0 {
        return None;
    }

    let inv_depth = 1.0 / proj.y;
    let center = (FB_WIDTH >> 1) as f32 * (1.0 + proj.x / proj.y);
    let (width, _) = sprite.kind.dimensions();
    let half = (width as f32 * inv_depth * 0.5).floor();
    if center + half < 0.0 || center - half >= FB_WIDTH as f32 {
        return None;
    }
    let screen_x = to_pixels(center);
    let half_width = to_pixels(half);

    let relative_rotation = match sprite.kind {
        SpriteType::Player => {
            let to_sprite = fast_normalize(sprite.position - camera.position);
            let cos = to_sprite.dot(world.player.direction).clamp(-1.0, 1.0);
            cos.acos() * sign(proj.x) + world.player.rotation
        }
        SpriteType::Bullet => 0.0,
    };

    Some(ProjectedSprite {
        id: sprite.id,
        kind: sprite.kind,
        screen_x,
        half_width,
        inv_depth,
        depth2: proj.y * proj.y,
        relative_rotation,
        rotation: sprite.rotation,
        anim_frame: sprite.anim_frame,
    })
}

/// Draws sprites in the given order, skipping columns hidden behind walls.
pub fn draw_sprites(
    visible: &[ProjectedSprite],
    depth: &[f32],
    alpha: u8,
    sink: &mut impl RenderSink,
) {
    for sprite in visible {
        draw_sprite(sprite, depth, alpha, sink);
    }
}

fn draw_sprite(sprite: &ProjectedSprite, depth: &[f32], alpha: u8, sink: &mut impl RenderSink) {
    let (_, height) = sprite.kind.dimensions();
    let screen_h = to_pixels(height as f32 * sprite.inv_depth);

    let x_start = sprite.screen_x - sprite.half_width;
    let x_end = sprite.screen_x + sprite.half_width;
    let y_end = match sprite.kind {
        SpriteType::Bullet => {
            (FB_HEIGHT as i32 + screen_h + to_pixels(BULLET_SCREEN_OFFSET * sprite.inv_depth)) >> 1
        }
        SpriteType::Player => to_pixels((FB_HEIGHT >> 1) as f32 * (1.0 + sprite.inv_depth)),
    };
    let y_start = y_end - screen_h;

    let span_w = (x_end - x_start).max(1) as f32;
    let span_h = (y_end - y_start).max(1) as f32;
    let (facing, mirrored) = facing(sprite);

    for x in x_start.max(0)..x_end.min(FB_WIDTH as i32) {
        if depth[x as usize] < sprite.depth2 {
            continue;
        }
        let mut u = (x - x_start) as f32 / span_w;
        if mirrored {
            u = 1.0 - u;
        }
        for y in y_start.max(0)..y_end.min(FB_HEIGHT as i32) {
            let v = (y - y_start) as f32 / span_h;
            let texel = match sprite.kind {
                SpriteType::Player => player_texel(u, v, facing, sprite.anim_frame),
                SpriteType::Bullet => bullet_texel(u, v),
            };
            if let Some(color) = texel {
                sink.set_pixel(x as usize, y as usize, color.with_alpha(alpha));
            }
        }
    }
}

/// Which of the five facing tiles to show and whether to mirror it.
fn facing(sprite: &ProjectedSprite) -> (u8, bool) {
    let slice = TAU / FACING_STEPS;
    let step = ((sprite.rotation + slice * 0.5 - sprite.relative_rotation + PI) * FACING_STEPS
        / TAU) as i32
        & 7;
    if step > 4 {
        ((8 - step) as u8, true)
    } else {
        (step as u8, false)
    }
}

fn player_texel(u: f32, v: f32, facing: u8, anim_frame: f32) -> Option<Color> {
    // Head in the top fifth, narrower torso, legs that alternate while walking
    let (left, right) = if v < 0.2 {
        (0.35, 0.65)
    } else if v < 0.65 {
        (0.2, 0.8)
    } else {
        let stride = if anim_frame < IDLE_FRAME && (anim_frame as i32) % 2 == 1 { 0.1 } else { 0.0 };
        if (u < 0.5 && u > 0.25 + stride) || (u >= 0.5 && u < 0.75 - stride) {
            (0.0, 1.0)
        } else {
            return None;
        }
    };
    if u < left || u >= right {
        return None;
    }
    if v < 0.2 {
        return Some(if facing == 4 { Color::Yellow } else { Color::DarkYellow });
    }
    if anim_frame > IDLE_FRAME && v < 0.65 {
        return Some(Color::Red);
    }
    Some(match facing {
        0 | 1 => Color::DarkGreen,
        _ => Color::Green,
    })
}

fn bullet_texel(u: f32, v: f32) -> Option<Color> {
    let du = u - 0.5;
    let dv = v - 0.5;
    let r2 = du * du + dv * dv;
    if r2 < 0.06 {
        Some(Color::Yellow)
    } else if r2 < 0.25 {
        Some(Color::Red)
    } else {
        None
    }
}
