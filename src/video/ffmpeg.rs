use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use super::Encoder;
use crate::error::EncodeError;
use crate::render::Frame;

pub static DEFAULT_ARGS: &[&str] = &[
    "-y",
    "-f",
    "rawvideo",
    "-pix_fmt",
    "rgba",
    "-video_size",
    "{video_size}",
    "-framerate",
    "{video_fps}",
    "-i",
    "-",
    "-c:v",
    "libx264",
    "-pix_fmt",
    "yuv420p",
    "{output_path}",
];
pub static REQUIRED_ARGS: &[&str] = &["{video_size}", "{video_fps}", "{output_path}"];

/// Pipes raw RGBA frames into an ffmpeg child process. ffmpeg's stderr goes
/// to `<output>.ffmpeg.log`.
pub struct FfmpegEncoder {
    program: String,
    args: Vec<String>,
    output: PathBuf,
    log_path: PathBuf,
    child: Option<Child>,
    stdin: Option<BufWriter<ChildStdin>>,
}

fn log_path_for(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".ffmpeg.log");
    PathBuf::from(name)
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<String>, args: Vec<String>, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        Self {
            program: program.into(),
            args,
            log_path: log_path_for(&output),
            output,
            child: None,
            stdin: None,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn expand_args(&self, width: u32, height: u32, fps: u32) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{video_size}", &format!("{}x{}", width, height))
                    .replace("{video_fps}", &fps.to_string())
                    .replace("{output_path}", self.output.to_string_lossy().as_ref())
            })
            .collect()
    }
}

impl Encoder for FfmpegEncoder {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> Result<(), EncodeError> {
        let args = self.expand_args(width, height, fps);
        let log = std::fs::File::create(&self.log_path)?;
        tracing::debug!(program = %self.program, ?args, log = %self.log_path.display(), "starting ffmpeg");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .spawn()
            .map_err(|source| EncodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EncodeError::Io(std::io::Error::other("ffmpeg stdin unavailable")))?;
        self.stdin = Some(BufWriter::new(stdin));
        self.child = Some(child);
        Ok(())
    }

    fn push(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        let stdin = self.stdin.as_mut().ok_or(EncodeError::NotOpen)?;
        stdin.write_all(frame.image.as_raw())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        // closing stdin tells ffmpeg the stream has ended
        let flushed = match self.stdin.take() {
            Some(mut stdin) => stdin.flush(),
            None => Ok(()),
        };
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(EncodeError::EncoderExited {
                status: status.to_string(),
                log: self.log_path.clone(),
            });
        }
        flushed?;
        tracing::info!(output = %self.output.display(), "ffmpeg finished");
        Ok(())
    }
}
