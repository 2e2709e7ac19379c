#[cfg(feature = "opencv")]
pub mod decoder;
#[cfg(feature = "opencv")]
pub mod encoder;

use crate::frame::Frame;
use anyhow::Result;
use std::path::PathBuf;

#[cfg(feature = "opencv")]
pub use decoder::VideoDecoder;
#[cfg(feature = "opencv")]
pub use encoder::VideoEncoder;

/// Frames in native stream order.
pub trait VideoSource {
    /// `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

pub trait VideoSink {
    fn write(&mut self, frame: &Frame) -> Result<()>;
    /// Flushes and finalizes the container. Writing after `close` is an error.
    fn close(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    pub path: PathBuf,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub path: PathBuf,
    pub frame_count: u32,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}
