use image::{Rgb, Rgba, RgbaImage};

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub image: RgbaImage,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb<u8>,
    /// 0 is invisible, 1 is opaque.
    pub alpha: f64,
}

pub fn blank(width: u32, height: u32, background: Rgb<u8>) -> RgbaImage {
    let [r, g, b] = background.0;
    RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]))
}

fn blend(dst: u8, src: u8, alpha: f64) -> u8 {
    (src as f64 * alpha + dst as f64 * (1.0 - alpha)).round() as u8
}

/// Mixes `color` into one pixel. Out-of-bounds coordinates are ignored.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgb<u8>, alpha: f64) {
    if alpha <= 0.0 || x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64
    {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for channel in 0..3 {
        pixel.0[channel] = blend(pixel.0[channel], color.0[channel], alpha.min(1.0));
    }
}

/// Source-over blend of an anti-aliased disc onto an opaque canvas.
pub fn draw_dot(canvas: &mut RgbaImage, dot: &Dot) {
    if dot.alpha <= 0.0 || dot.radius <= 0.0 {
        return;
    }

    let reach = dot.radius + 0.5;
    let min_x = (dot.x - reach).floor().max(0.0) as u32;
    let min_y = (dot.y - reach).floor().max(0.0) as u32;
    let max_x = ((dot.x + reach).ceil().max(0.0) as u32).min(canvas.width());
    let max_y = ((dot.y + reach).ceil().max(0.0) as u32).min(canvas.height());

    for py in min_y..max_y {
        for px in min_x..max_x {
            let dx = px as f64 + 0.5 - dot.x;
            let dy = py as f64 + 0.5 - dot.y;
            let coverage = (reach - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
            let alpha = dot.alpha.min(1.0) * coverage;
            blend_pixel(canvas, px as i64, py as i64, dot.color, alpha);
        }
    }
}
