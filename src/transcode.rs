use crate::util::ScopedTimer;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("{program} not found. Please install it and try again.")]
    Missing { program: String },
    #[error("{program} exited with {status}: {diagnostic}")]
    Failed {
        program: String,
        status: ExitStatus,
        diagnostic: String,
    },
    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

/// Re-encodes the recording with an external tool into a widely supported codec.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Transcoder {
    pub program: String,
    pub codec: String,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_owned(),
            codec: "libx264".to_owned(),
        }
    }
}

impl Transcoder {
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input.into(),
            "-c:v".into(),
            self.codec.clone().into(),
            output.into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
        ]
    }

    /// Blocks until the tool has exited.
    pub fn run(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let _timer = ScopedTimer::new("transcode");
        log::debug!("Running {} {:?}", self.program, self.args(input, output));
        let result = Command::new(&self.program)
            .args(self.args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();
        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TranscodeError::Missing {
                    program: self.program.clone(),
                })
            }
            Err(source) => {
                return Err(TranscodeError::Io {
                    program: self.program.clone(),
                    source,
                })
            }
        };
        if !out.status.success() {
            return Err(TranscodeError::Failed {
                program: self.program.clone(),
                status: out.status,
                diagnostic: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcoder(program: &str) -> Transcoder {
        Transcoder {
            program: program.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn argument_shape() {
        let args = Transcoder::default().args(
            Path::new("results/tracked_cars.mp4"),
            Path::new("results/tracked_cars_h264.mp4"),
        );
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            args,
            vec![
                "-y",
                "-i",
                "results/tracked_cars.mp4",
                "-c:v",
                "libx264",
                "results/tracked_cars_h264.mp4",
                "-hide_banner",
                "-loglevel",
                "error"
            ]
        );
    }

    #[test]
    fn missing_tool() {
        let err = transcoder("multitrack-no-such-transcoder")
            .run(Path::new("in.mp4"), Path::new("out.mp4"))
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Missing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool() {
        let err = transcoder("false")
            .run(Path::new("in.mp4"), Path::new("out.mp4"))
            .unwrap_err();
        match err {
            TranscodeError::Failed { status, .. } => assert!(!status.success()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_tool() {
        transcoder("true")
            .run(Path::new("in.mp4"), Path::new("out.mp4"))
            .unwrap();
    }
}
