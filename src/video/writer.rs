use super::Encoder;
use crate::error::EncodeError;
use crate::render::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Unopened,
    Open { last_index: Option<u64> },
    Closed,
}

/// Ordered frame sink over an `Encoder`. An open writer is closed when it
/// is dropped, so the encoder is finalized even after a failed write.
pub struct VideoWriter<E: Encoder> {
    encoder: E,
    fps: u32,
    width: u32,
    height: u32,
    state: WriterState,
    frames_written: u64,
}

impl<E: Encoder> VideoWriter<E> {
    pub fn new(encoder: E, fps: u32, (width, height): (u32, u32)) -> Self {
        Self {
            encoder,
            fps,
            width,
            height,
            state: WriterState::Unopened,
            frames_written: 0,
        }
    }

    /// `new` followed by `open`.
    pub fn create(encoder: E, fps: u32, size: (u32, u32)) -> Result<Self, EncodeError> {
        let mut writer = Self::new(encoder, fps, size);
        writer.open()?;
        Ok(writer)
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn open(&mut self) -> Result<(), EncodeError> {
        match self.state {
            WriterState::Unopened => {}
            WriterState::Open { .. } => return Err(EncodeError::AlreadyOpen),
            WriterState::Closed => return Err(EncodeError::Closed),
        }
        self.encoder.start(self.width, self.height, self.fps)?;
        self.state = WriterState::Open { last_index: None };
        tracing::debug!(
            width = self.width,
            height = self.height,
            fps = self.fps,
            "opened video stream"
        );
        Ok(())
    }

    pub fn write(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        let last_index = match self.state {
            WriterState::Open { last_index } => last_index,
            WriterState::Unopened => return Err(EncodeError::NotOpen),
            WriterState::Closed => return Err(EncodeError::Closed),
        };
        if let Some(last) = last_index {
            if frame.index <= last {
                return Err(EncodeError::OutOfOrder {
                    last,
                    got: frame.index,
                });
            }
        }
        if frame.width() != self.width || frame.height() != self.height {
            return Err(EncodeError::DimensionMismatch {
                index: frame.index,
                width: self.width,
                height: self.height,
                got_width: frame.width(),
                got_height: frame.height(),
            });
        }

        self.encoder.push(frame)?;
        self.state = WriterState::Open {
            last_index: Some(frame.index),
        };
        self.frames_written += 1;
        Ok(())
    }

    /// No-op unless open. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), EncodeError> {
        match self.state {
            WriterState::Open { .. } => {
                self.state = WriterState::Closed;
                self.encoder.finish()?;
                tracing::debug!(frames = self.frames_written, "closed video stream");
                Ok(())
            }
            WriterState::Unopened | WriterState::Closed => Ok(()),
        }
    }
}

impl<E: Encoder> Drop for VideoWriter<E> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!("failed to finalize video stream: {}", e);
        }
    }
}
