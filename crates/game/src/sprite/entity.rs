use glam::Vec2;

use crate::net::{SpriteRecord, Transform};

pub const PLAYER_RADIUS: f32 = 0.20;
pub const BULLET_RADIUS: f32 = 0.01;

pub const PLAYER_ANIM_FPS: f32 = 6.0;
/// Walk cycle frames are `0.0..IDLE_FRAME`; the idle pose starts there.
pub const IDLE_FRAME: f32 = 4.0;
pub const FIRING_FRAME: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpriteType {
    Player = 0,
    Bullet = 1,
}

impl TryFrom<u8> for SpriteType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Player),
            1 => Ok(Self::Bullet),
            other => Err(other),
        }
    }
}

impl SpriteType {
    pub fn radius(self) -> f32 {
        match self {
            Self::Player => PLAYER_RADIUS,
            Self::Bullet => BULLET_RADIUS,
        }
    }

    /// Unscaled on-screen size in pixels at distance 1.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Player => (120, 240),
            Self::Bullet => (16, 16),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: u8,
    pub owner: u8,
    pub kind: SpriteType,
    pub rotation: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Set once a bullet hits something; disabled sprites no longer move or draw.
    pub disabled: bool,
    pub anim_frame: f32,
}

impl Sprite {
    pub fn new(id: u8, owner: u8, kind: SpriteType) -> Self {
        Self {
            id,
            owner,
            kind,
            rotation: 0.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            disabled: false,
            anim_frame: 0.0,
        }
    }

    /// `None` if the record names an unknown sprite type.
    pub fn from_record(record: &SpriteRecord) -> Option<Self> {
        let kind = SpriteType::try_from(record.desc.kind).ok()?;
        let mut sprite = Self::new(record.desc.id, record.desc.owner, kind);
        sprite.apply_transform(&record.transform);
        Some(sprite)
    }

    pub fn apply_transform(&mut self, transform: &Transform) {
        self.rotation = transform.rotation;
        self.position = transform.position;
        self.velocity = transform.velocity;
        self.disabled = false;
    }

    pub fn radius(&self) -> f32 {
        self.kind.radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::SpriteDesc;

    #[test]
    fn test_unknown_type_is_rejected() {
        assert_eq!(SpriteType::try_from(7), Err(7));
        let record = SpriteRecord {
            desc: SpriteDesc {
                kind: 9,
                id: 1,
                owner: 0,
                field: 0,
            },
            transform: Transform::default(),
        };
        assert!(Sprite::from_record(&record).is_none());
    }

    #[test]
    fn test_radius_follows_type() {
        assert_eq!(Sprite::new(3, 0, SpriteType::Bullet).radius(), BULLET_RADIUS);
        assert_eq!(Sprite::new(0, 0, SpriteType::Player).radius(), PLAYER_RADIUS);
    }
}
