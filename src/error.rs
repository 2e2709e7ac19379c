use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Video file not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Could not read video {path}: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },
    #[error("No {extension} files found in {dir}")]
    NoVideoFiles { dir: PathBuf, extension: String },
    #[error("Input closed before a video was selected")]
    NoChoice,
    #[error("Empty region {width}x{height}")]
    EmptyRegion { width: i32, height: i32 },
    #[error("Frame size {actual:?} does not match session size {expected:?}")]
    FrameSize {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Invalid frame buffer: expected {expected} bytes, got {actual}")]
    InvalidFrame { expected: usize, actual: usize },
}
