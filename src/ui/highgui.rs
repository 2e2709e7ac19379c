use super::{Interaction, KeyBindings, Signal};
use crate::frame::{BoundingBox, Frame};
use anyhow::Result;
use cv::core::{Rect, Vector};
use cv::highgui;

/// OpenCV window with mouse-drag ROI selection and key polling.
pub struct HighguiInteraction {
    window_name: String,
    keys: KeyBindings,
}

impl HighguiInteraction {
    pub fn new(window_name: &str, keys: KeyBindings) -> Self {
        Self {
            window_name: window_name.to_owned(),
            keys,
        }
    }
}

impl Interaction for HighguiInteraction {
    fn select_many(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>> {
        let mut rois = Vector::<Rect>::new();
        frame.with_mat(|mat| {
            Ok(highgui::select_rois(
                &self.window_name,
                mat,
                &mut rois,
                true,  // show_crosshair
                false, // from_center
                true,  // print_notice
            )?)
        })?;
        highgui::destroy_all_windows()?;
        Ok(rois.iter().map(BoundingBox::from).collect())
    }

    fn select_one(&mut self, frame: &Frame) -> Result<Option<BoundingBox>> {
        let roi = frame.with_mat(|mat| {
            Ok(highgui::select_roi(
                &self.window_name,
                mat,
                true,  // show_crosshair
                false, // from_center
                true,  // print_notice
            )?)
        })?;
        highgui::destroy_all_windows()?;
        // cancelling yields an empty rectangle
        if roi.width == 0 && roi.height == 0 {
            return Ok(None);
        }
        Ok(Some(BoundingBox::from(roi)))
    }

    fn show(&mut self, frame: &Frame) -> Result<()> {
        frame.with_mat(|mat| Ok(highgui::imshow(&self.window_name, mat)?))
    }

    fn poll_signal(&mut self) -> Result<Signal> {
        let key = highgui::wait_key(1)?;
        Ok(self.keys.signal(key))
    }
}

impl Drop for HighguiInteraction {
    fn drop(&mut self) {
        crate::log_error!(highgui::destroy_all_windows());
    }
}
