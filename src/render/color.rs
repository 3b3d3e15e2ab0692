use image::Rgb;

/// `h`, `s` and `v` in [0, 1].
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb<u8> {
    let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;

    if s == 0.0 {
        return Rgb([to_byte(v); 3]);
    }

    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb([to_byte(r), to_byte(g), to_byte(b)])
}

fn normalize(value: u8, (min, max): (u8, u8)) -> Option<f64> {
    if max <= min {
        return None;
    }
    Some(((value as f64 - min as f64) / (max as f64 - min as f64)).clamp(0.0, 1.0))
}

/// Maps pitch to hue and velocity to brightness, relative to the ranges
/// found in the piece.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub pitch_range: (u8, u8),
    pub velocity_range: (u8, u8),
    pub min_brightness: f64,
}

impl Palette {
    /// Lowest pitch is blue, the middle green, the highest red: the first
    /// 240 degrees of the hue circle, reversed.
    pub fn hue(&self, pitch: u8) -> f64 {
        let n = normalize(pitch, self.pitch_range).unwrap_or(0.5);
        2.0 * (1.0 - n) / 3.0
    }

    /// 0 for the quietest note of the piece, 1 for the loudest.
    pub fn loudness(&self, velocity: u8) -> f64 {
        normalize(velocity, self.velocity_range).unwrap_or(1.0)
    }

    pub fn color(&self, pitch: u8, velocity: u8) -> Rgb<u8> {
        let value = self.min_brightness + (1.0 - self.min_brightness) * self.loudness(velocity);
        hsv_to_rgb(self.hue(pitch), 1.0, value)
    }
}
