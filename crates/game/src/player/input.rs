use bitflags::bitflags;
use glam::Vec2;

use crate::math::INV_SQRT2;

bitflags! {
    /// Movement keys currently held. The bit layout is the wire layout: one
    /// byte per key, forward in the lowest byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HeldKeys: u32 {
        const FORWARD = 1;
        const BACKWARD = 1 << 8;
        const RIGHT = 1 << 16;
        const LEFT = 1 << 24;
    }
}

impl HeldKeys {
    /// Unit (or zero) movement direction for a player facing `facing`.
    pub fn movement_direction(self, facing: Vec2) -> Vec2 {
        let longitudinal = self.axis(Self::FORWARD, Self::BACKWARD);
        let lateral = self.axis(Self::RIGHT, Self::LEFT);

        let mut direction = facing * longitudinal;
        if lateral != 0.0 {
            direction += facing.perp() * lateral;
            if longitudinal != 0.0 {
                direction *= INV_SQRT2;
            }
        }
        direction
    }

    fn axis(self, positive: Self, negative: Self) -> f32 {
        let pos = if self.contains(positive) { 1.0 } else { 0.0 };
        let neg = if self.contains(negative) { 1.0 } else { 0.0 };
        pos - neg
    }
}
