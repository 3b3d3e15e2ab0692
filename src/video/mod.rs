mod ffmpeg;
mod png;
mod writer;

pub use ffmpeg::{DEFAULT_ARGS, FfmpegEncoder, REQUIRED_ARGS};
pub use png::PngSequenceEncoder;
pub use writer::{VideoWriter, WriterState};

use crate::error::EncodeError;
use crate::render::Frame;

/// Backend that turns frames into a file. Driven by `VideoWriter`, which
/// checks ordering and dimensions before frames reach it.
pub trait Encoder {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> Result<(), EncodeError>;
    fn push(&mut self, frame: &Frame) -> Result<(), EncodeError>;
    fn finish(&mut self) -> Result<(), EncodeError>;
}

impl<E: Encoder + ?Sized> Encoder for &mut E {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> Result<(), EncodeError> {
        (**self).start(width, height, fps)
    }

    fn push(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        (**self).push(frame)
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        (**self).finish()
    }
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> Result<(), EncodeError> {
        (**self).start(width, height, fps)
    }

    fn push(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        (**self).push(frame)
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        (**self).finish()
    }
}
