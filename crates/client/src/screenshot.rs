use std::path::Path;

use anyhow::Context;
use gloom::Framebuffer;
use gloom::render::{FB_HEIGHT, FB_WIDTH};
use image::RgbaImage;

/// Writes the framebuffer to `path` as a PNG.
pub fn save_png(framebuffer: &Framebuffer, path: &Path) -> anyhow::Result<()> {
    let image = RgbaImage::from_raw(FB_WIDTH as u32, FB_HEIGHT as u32, framebuffer.to_rgba_bytes())
        .context("framebuffer size does not match the image")?;
    image
        .save(path)
        .with_context(|| format!("writing screenshot to {}", path.display()))?;
    log::info!("saved screenshot to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use gloom::RenderSink;
    use gloom::render::Color;

    use super::*;

    #[test]
    fn test_png_keeps_pixels() {
        let mut framebuffer = Framebuffer::new();
        framebuffer.set_pixel(3, 2, Color::Red.solid());
        let path = std::env::temp_dir().join(format!("gloom-shot-{}.png", std::process::id()));

        save_png(&framebuffer, &path).unwrap();
        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (FB_WIDTH as u32, FB_HEIGHT as u32));
        assert_eq!(image.get_pixel(3, 2).0, Color::Red.solid().to_le_bytes());
        std::fs::remove_file(&path).unwrap();
    }
}
