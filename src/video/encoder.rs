use super::{EncoderSettings, VideoSink};
use crate::error::SessionError;
use crate::frame::Frame;
use anyhow::{anyhow, Context, Result};
use cv::prelude::*;
use cv::videoio::VideoWriter;

pub struct VideoEncoder {
    writer: Option<VideoWriter>,
    settings: EncoderSettings,
    frame_number: u64,
}

impl VideoEncoder {
    pub fn new(settings: &EncoderSettings) -> Result<Self> {
        let path = settings
            .path
            .to_str()
            .context("Output path is not valid UTF-8")?;
        let writer = VideoWriter::new(
            path,
            VideoWriter::fourcc('m', 'p', '4', 'v')?,
            settings.fps,
            cv::core::Size::new(settings.width as i32, settings.height as i32),
            true, // is_color
        )?;
        if !writer.is_opened()? {
            return Err(anyhow!(
                "Failed to open video writer with settings: {:?}",
                settings
            ));
        }
        Ok(Self {
            writer: Some(writer),
            settings: settings.clone(),
            frame_number: 0,
        })
    }
}

impl VideoSink for VideoEncoder {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| anyhow!("Video writer already closed"))?;
        let expected = (self.settings.width, self.settings.height);
        if frame.size() != expected {
            return Err(SessionError::FrameSize {
                expected,
                actual: frame.size(),
            }
            .into());
        }
        frame.with_mat(|mat| Ok(writer.write(mat)?))?;
        self.frame_number += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.release()?;
            log::info!(
                "Wrote {} frames to {}",
                self.frame_number,
                self.settings.path.display()
            );
        }
        Ok(())
    }
}

impl Drop for VideoEncoder {
    fn drop(&mut self) {
        crate::log_error!(self.close());
    }
}
