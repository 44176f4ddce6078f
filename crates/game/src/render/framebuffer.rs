pub const FB_WIDTH: usize = 640;
pub const FB_HEIGHT: usize = 480;

/// Destination for rendered pixels. Coordinates are always inside
/// `FB_WIDTH` x `FB_HEIGHT`.
pub trait RenderSink {
    fn set_pixel(&mut self, x: usize, y: usize, color: u32);
    fn get_pixel(&self, x: usize, y: usize) -> u32;

    /// Fills a rectangle, clipped to the screen.
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(FB_WIDTH as i32);
        let y1 = (y + height).min(FB_HEIGHT as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px as usize, py as usize, color);
            }
        }
    }
}

/// In-memory 640x480 ABGR pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pixels: Vec<u32>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; FB_WIDTH * FB_HEIGHT],
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixels as RGBA bytes, which is the in-memory order of ABGR words.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
    }
}

impl RenderSink for Framebuffer {
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[x + y * FB_WIDTH] = color;
    }

    #[inline]
    fn get_pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[x + y * FB_WIDTH]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut fb = Framebuffer::new();
        fb.fill_rect(-2, FB_HEIGHT as i32 - 1, 4, 4, 7);
        assert_eq!(fb.get_pixel(0, FB_HEIGHT - 1), 7);
        assert_eq!(fb.get_pixel(1, FB_HEIGHT - 1), 7);
        assert_eq!(fb.get_pixel(2, FB_HEIGHT - 1), 0);
        assert_eq!(fb.pixels().iter().filter(|&&p| p == 7).count(), 2);
    }

    #[test]
    fn test_rgba_bytes_put_red_first() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(0, 0, 0xFF00_00FE);
        assert_eq!(&fb.to_rgba_bytes()[..4], &[0xFE, 0x00, 0x00, 0xFF]);
    }
}
