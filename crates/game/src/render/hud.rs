use crate::math::lerp;
use crate::player::PLAYER_MAX_HEALTH;
use crate::world::World;

use super::color::{Color, invert};
use super::framebuffer::{FB_HEIGHT, FB_WIDTH, RenderSink};

const CROSSHAIR_SIZE: usize = 16;
const CROSSHAIR_THICKNESS: usize = 2;

const HEALTH_BAR_X: i32 = 8;
const HEALTH_BAR_Y: i32 = 8;
const HEALTH_BAR_WIDTH: i32 = 64;
const HEALTH_BAR_HEIGHT: i32 = 7;
/// Weight kept by the displayed health each frame while it catches up.
const HEALTH_BAR_LAG: f32 = 0.85;

const MINIMAP_TILE: i32 = 4;

const GLYPH_COLUMNS: i32 = 3;
const GLYPH_ROWS: i32 = 5;
const GLYPH_SCALE: i32 = 2;
const GLYPH_ADVANCE: i32 = (GLYPH_COLUMNS + 1) * GLYPH_SCALE;
const TEXT_HEIGHT: i32 = GLYPH_ROWS * GLYPH_SCALE;
const GAME_ID_MARGIN: i32 = 32;

/// 3x5 bitmap rows, most significant of the three bits on the left.
fn glyph(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        _ => [0; 5],
    }
}

fn text_width(text: &str) -> i32 {
    match text.chars().count() as i32 {
        0 => 0,
        n => n * GLYPH_ADVANCE - GLYPH_SCALE,
    }
}

fn draw_text(x: i32, y: i32, text: &str, color: u32, sink: &mut impl RenderSink) {
    for (i, ch) in text.chars().enumerate() {
        let left = x + i as i32 * GLYPH_ADVANCE;
        for (row, bits) in glyph(ch).into_iter().enumerate() {
            for col in 0..GLYPH_COLUMNS {
                if bits & (0b100 >> col) != 0 {
                    sink.fill_rect(
                        left + col * GLYPH_SCALE,
                        y + row as i32 * GLYPH_SCALE,
                        GLYPH_SCALE,
                        GLYPH_SCALE,
                        color,
                    );
                }
            }
        }
    }
}

pub fn draw_crosshair(alpha: u8, sink: &mut impl RenderSink) {
    let origin_x = (FB_WIDTH - CROSSHAIR_SIZE) >> 1;
    let origin_y = (FB_HEIGHT - CROSSHAIR_SIZE) >> 1;
    let band = (CROSSHAIR_SIZE - CROSSHAIR_THICKNESS) >> 1..(CROSSHAIR_SIZE + CROSSHAIR_THICKNESS) >> 1;

    for i in 0..CROSSHAIR_SIZE {
        for j in 0..CROSSHAIR_SIZE {
            if band.contains(&i) || band.contains(&j) {
                let (x, y) = (origin_x + i, origin_y + j);
                let pixel = sink.get_pixel(x, y);
                sink.set_pixel(x, y, invert(pixel, alpha));
            }
        }
    }
}

/// Draws the health bar. `display_health` trails the real value to show
/// recent damage and is updated in place.
pub fn draw_health(health: i32, display_health: &mut i32, alpha: u8, sink: &mut impl RenderSink) {
    let damaged = *display_health != health;
    if damaged {
        sink.fill_rect(
            HEALTH_BAR_X - 4,
            HEALTH_BAR_Y - 4,
            HEALTH_BAR_WIDTH + 8,
            HEALTH_BAR_HEIGHT + 8,
            Color::Magenta.with_alpha(alpha),
        );
    }

    let width = health * HEALTH_BAR_WIDTH / PLAYER_MAX_HEALTH;
    sink.fill_rect(HEALTH_BAR_X, HEALTH_BAR_Y, width, HEALTH_BAR_HEIGHT, Color::Red.with_alpha(alpha));

    if damaged {
        let lost = (*display_health - health) * HEALTH_BAR_WIDTH / PLAYER_MAX_HEALTH;
        sink.fill_rect(HEALTH_BAR_X + width, HEALTH_BAR_Y, lost, HEALTH_BAR_HEIGHT, Color::White.with_alpha(alpha));

        let next = lerp(HEALTH_BAR_LAG, health as f32, *display_health as f32) as i32;
        // Truncation can stall one point away when catching up from below
        *display_health = if next == *display_health { health } else { next };
    }
}

pub fn draw_minimap(world: &World, alpha: u8, sink: &mut impl RenderSink) {
    let map = &world.map;
    if !map.is_loaded() {
        return;
    }
    let width = map.width() as i32;
    let height = map.height() as i32;
    let left = FB_WIDTH as i32 - width * MINIMAP_TILE - 4;
    let top = 4;

    sink.fill_rect(left, top, width * MINIMAP_TILE, height * MINIMAP_TILE, Color::White.with_alpha(alpha));
    for y in 0..height {
        for x in 0..width {
            if map.cell(x, y).is_some_and(|c| c != 0) {
                sink.fill_rect(
                    left + x * MINIMAP_TILE,
                    top + y * MINIMAP_TILE,
                    MINIMAP_TILE,
                    MINIMAP_TILE,
                    Color::Gray.with_alpha(alpha),
                );
            }
        }
    }

    let marker = world.player.position * MINIMAP_TILE as f32;
    sink.fill_rect(
        left + marker.x as i32 - (MINIMAP_TILE >> 2),
        top + marker.y as i32 - (MINIMAP_TILE >> 2),
        MINIMAP_TILE >> 1,
        MINIMAP_TILE >> 1,
        Color::Red.with_alpha(alpha),
    );
}

/// Labels the bottom-right corner with the game id so it can be shared
/// with other players. Always drawn solid, whatever the scene alpha.
pub fn draw_game_id(game_id: u32, sink: &mut impl RenderSink) {
    let text = format!("GAME ID: {game_id:X}");
    let width = text_width(&text);
    let x = FB_WIDTH as i32 - GAME_ID_MARGIN - width;
    let y = FB_HEIGHT as i32 - GAME_ID_MARGIN - TEXT_HEIGHT;
    sink.fill_rect(x - 2, y - 2, width + 4, TEXT_HEIGHT + 4, Color::DarkRed.solid());
    draw_text(x, y, &text, Color::LightGray.solid(), sink);
}
