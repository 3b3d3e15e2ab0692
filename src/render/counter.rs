use image::{Rgb, RgbaImage};
use rusttype::{Font, Scale, point};

use super::canvas::blend_pixel;

/// Running count of the notes played so far, centered on the canvas under
/// the dots.
#[derive(Debug, Clone)]
pub struct CounterStyle {
    pub font: Font<'static>,
    pub size: f32,
    pub color: Rgb<u8>,
    /// Zero padded width, `00042` for 5.
    pub digits: usize,
    /// Seconds of video over which the counter fades in.
    pub fade_in: f64,
}

pub fn counter_text(count: usize, digits: usize) -> String {
    format!("{:0width$}", count, width = digits)
}

/// Opacity at `video_seconds` from the first frame, lead-in included.
pub fn counter_alpha(video_seconds: f64, fade_in: f64) -> f64 {
    if fade_in <= 0.0 {
        return 1.0;
    }
    (video_seconds / fade_in).clamp(0.0, 1.0)
}

impl CounterStyle {
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, alpha: f64) {
        if alpha <= 0.0 || text.is_empty() {
            return;
        }

        let scale = Scale::uniform(self.size);
        let v_metrics = self.font.v_metrics(scale);
        let glyphs: Vec<_> = self
            .font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .collect();
        let text_width = glyphs
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .map(|bb| bb.max.x)
            .max()
            .unwrap_or(0);
        let text_height = (v_metrics.ascent - v_metrics.descent).ceil() as i64;

        let left = canvas.width() as i64 / 2 - text_width as i64 / 2;
        let top = canvas.height() as i64 / 2 - text_height / 2;

        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|x, y, coverage| {
                let px = left + bb.min.x as i64 + x as i64;
                let py = top + bb.min.y as i64 + y as i64;
                blend_pixel(canvas, px, py, self.color, alpha * coverage as f64);
            });
        }
    }
}
