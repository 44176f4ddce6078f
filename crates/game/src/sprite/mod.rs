mod collection;
mod entity;

pub use collection::{MAX_SPRITES, Sprites};
pub use entity::{
    BULLET_RADIUS, FIRING_FRAME, IDLE_FRAME, PLAYER_ANIM_FPS, PLAYER_RADIUS, Sprite, SpriteType,
};
