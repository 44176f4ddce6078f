use super::entity::{Sprite, SpriteType};

pub const MAX_SPRITES: usize = 255;

/// Dense list of remote sprites, at most one per id. Also remembers which
/// sprite the camera follows while spectating.
#[derive(Debug, Default)]
pub struct Sprites {
    sprites: Vec<Sprite>,
    tracked: Option<u8>,
}

impl Sprites {
    pub fn new() -> Self {
        Self {
            sprites: Vec::with_capacity(MAX_SPRITES),
            tracked: None,
        }
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.tracked = None;
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn get(&self, id: u8) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: u8) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id == id)
    }

    /// Replaces the sprite with the same id, or appends it. Returns `None`
    /// when the list is full and the id is new.
    pub fn insert(&mut self, sprite: Sprite) -> Option<&mut Sprite> {
        match self.sprites.iter().position(|s| s.id == sprite.id) {
            Some(index) => {
                self.sprites[index] = sprite;
                Some(&mut self.sprites[index])
            }
            None if self.sprites.len() < MAX_SPRITES => {
                self.sprites.push(sprite);
                self.sprites.last_mut()
            }
            None => None,
        }
    }

    /// Removes a sprite, shifting later entries down. Tracking a removed
    /// sprite is dropped so a recycled id is not followed by accident.
    pub fn remove(&mut self, id: u8) -> Option<Sprite> {
        let index = self.sprites.iter().position(|s| s.id == id)?;
        if self.tracked == Some(id) {
            self.tracked = None;
        }
        Some(self.sprites.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn as_slice(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn as_mut_slice(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn player_count(&self) -> usize {
        self.sprites
            .iter()
            .filter(|s| s.kind == SpriteType::Player)
            .count()
    }

    /// Follows sprite `id`, or nothing if no such sprite exists.
    pub fn track(&mut self, id: u8) {
        self.tracked = self.get(id).map(|s| s.id);
    }

    pub fn tracked_id(&self) -> Option<u8> {
        self.tracked
    }

    pub fn tracked(&self) -> Option<&Sprite> {
        self.tracked.and_then(|id| self.get(id))
    }
}
