//! 16-entry palette in ABGR layout (red in the low byte).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black,
    Gray,
    LightGray,
    White,
    DarkRed,
    Red,
    DarkGreen,
    Green,
    DarkYellow,
    Yellow,
    DarkBlue,
    Blue,
    DarkMagenta,
    Magenta,
    DarkCyan,
    Cyan,
}

const PALETTE: [u32; 16] = [
    0x000000, 0x7E7E7E, 0xBEBEBE, 0xFFFFFF, 0x00007E, 0x0000FE, 0x007E04, 0x04FF06, 0x007E7E,
    0x04FFFF, 0x7E0000, 0xFF0000, 0x7E007E, 0xFF00FE, 0x7E7E04, 0xFFFF06,
];

pub const ALPHA_OPAQUE: u8 = 0xFF;
pub const ALPHA_DIMMED: u8 = 0x7F;

impl Color {
    pub fn rgb(self) -> u32 {
        PALETTE[self as usize]
    }

    /// Palette entry combined with the alpha byte.
    pub fn with_alpha(self, alpha: u8) -> u32 {
        alpha_mask(alpha) | self.rgb()
    }

    pub fn solid(self) -> u32 {
        self.with_alpha(ALPHA_OPAQUE)
    }
}

#[inline]
pub fn alpha_mask(alpha: u8) -> u32 {
    (alpha as u32) << 24
}

/// Inverts the colour channels and replaces the alpha byte.
#[inline]
pub fn invert(pixel: u32, alpha: u8) -> u32 {
    (!pixel & 0x00FF_FFFF) | alpha_mask(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_is_low_byte() {
        assert_eq!(Color::Red.solid(), 0xFF00_00FE);
        assert_eq!(Color::Blue.with_alpha(ALPHA_DIMMED), 0x7FFF_0000);
    }

    #[test]
    fn test_invert_keeps_requested_alpha() {
        assert_eq!(invert(Color::White.solid(), ALPHA_OPAQUE), 0xFF00_0000);
        assert_eq!(invert(0x0012_3456, ALPHA_DIMMED), 0x7FED_CBA9);
    }
}
