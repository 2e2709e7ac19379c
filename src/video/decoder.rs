use super::{VideoInfo, VideoSource};
use crate::error::SessionError;
use crate::frame::Frame;
use anyhow::Result;
use cv::prelude::*;
use cv::videoio::VideoCapture;
use std::path::Path;

pub struct VideoDecoder {
    pub info: VideoInfo,
    capture: VideoCapture,
    frame_number: u32,
}

impl VideoDecoder {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SessionError::SourceNotFound(path.to_owned()).into());
        }
        let unreadable = |reason: String| SessionError::SourceUnreadable {
            path: path.to_owned(),
            reason,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| unreadable("path is not valid UTF-8".to_owned()))?;
        let capture = VideoCapture::from_file(path_str, cv::videoio::CAP_ANY)
            .map_err(|e| unreadable(e.to_string()))?;
        if !capture.is_opened()? {
            return Err(unreadable("no backend could open the file".to_owned()).into());
        }
        let frame_count = capture.get(cv::videoio::CAP_PROP_FRAME_COUNT)? as u32;
        let width = capture.get(cv::videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(cv::videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let fps = capture.get(cv::videoio::CAP_PROP_FPS)?;
        let info = VideoInfo {
            path: path.to_owned(),
            frame_count,
            width,
            height,
            fps,
        };
        log::info!(
            "Opened {} ({}x{}, {} frames at {:.2} fps)",
            path.display(),
            width,
            height,
            frame_count,
            fps
        );
        Ok(Self {
            info,
            capture,
            frame_number: 0,
        })
    }
}

impl VideoSource for VideoDecoder {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut img = Mat::default();
        if !self.capture.read(&mut img)? || img.empty() {
            log::debug!("End of stream after {} frames", self.frame_number);
            return Ok(None);
        }
        self.frame_number += 1;
        Ok(Some(Frame::from_mat(&img)?))
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        crate::log_error!(self.capture.release());
    }
}
