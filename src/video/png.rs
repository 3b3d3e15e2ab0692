use std::path::PathBuf;

use super::Encoder;
use crate::error::EncodeError;
use crate::render::Frame;

/// Writes every frame as `frame_000000.png`, `frame_000001.png`, ... into a
/// directory.
pub struct PngSequenceEncoder {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceEncoder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", index))
    }
}

impl Encoder for PngSequenceEncoder {
    fn start(&mut self, _width: u32, _height: u32, _fps: u32) -> Result<(), EncodeError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn push(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        let path = self.frame_path(frame.index);
        frame
            .image
            .save(&path)
            .map_err(|source| EncodeError::Image { path, source })?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        tracing::info!(dir = %self.dir.display(), frames = self.written, "wrote png sequence");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::blank;
    use image::{Rgb, Rgba};

    #[test]
    fn writes_numbered_pngs() {
        let dir = std::env::temp_dir().join(format!("dotfade-png-{}", std::process::id()));
        let mut encoder = PngSequenceEncoder::new(&dir);
        encoder.start(4, 4, 30).unwrap();
        encoder
            .push(&Frame {
                index: 7,
                image: blank(4, 4, Rgb([1, 2, 3])),
            })
            .unwrap();
        encoder.finish().unwrap();

        let path = dir.join("frame_000007.png");
        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (4, 4));
        assert_eq!(*image.get_pixel(2, 2), Rgba([1, 2, 3, 255]));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
