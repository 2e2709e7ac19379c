use crate::error::SessionError;
use anyhow::Result;

/// Number of interleaved channels per pixel (BGR).
pub const CHANNELS: usize = 3;

/// A decoded video frame: tightly packed, row-major 8-bit BGR samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// A black frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn from_bgr(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(SessionError::InvalidFrame {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn fill(&mut self, color: [u8; 3]) {
        for pixel in self.data.chunks_exact_mut(CHANNELS) {
            pixel.copy_from_slice(&color);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let offset = self.offset(x, y)?;
        let mut color = [0; 3];
        color.copy_from_slice(&self.data[offset..offset + CHANNELS]);
        Some(color)
    }

    /// Pixels outside of the frame are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if let Some(offset) = self.offset(x, y) {
            self.data[offset..offset + CHANNELS].copy_from_slice(&color);
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }
}

/// Rectangle as returned by a selection UI. May be empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Axis-aligned rectangle in frame coordinates with a strictly positive area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Region {
    /// Returns `None` for zero-area or negative rectangles.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Bottom right corner, inclusive.
    pub fn max(&self) -> (i32, i32) {
        (
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }
}

impl TryFrom<BoundingBox> for Region {
    type Error = SessionError;

    fn try_from(bbox: BoundingBox) -> Result<Self, Self::Error> {
        Region::new(bbox.x, bbox.y, bbox.width, bbox.height).ok_or(SessionError::EmptyRegion {
            width: bbox.width,
            height: bbox.height,
        })
    }
}

impl From<Region> for BoundingBox {
    fn from(region: Region) -> Self {
        BoundingBox::new(region.x, region.y, region.width, region.height)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(feature = "opencv")]
mod cv_interop {
    use super::{BoundingBox, Frame, Region, CHANNELS};
    use anyhow::Result;
    use cv::prelude::*;

    impl Frame {
        /// Converts a decoded `Mat` into an owned BGR frame.
        pub fn from_mat(mat: &Mat) -> Result<Self> {
            let mut bgr = Mat::default();
            match mat.channels() {
                1 => cv::imgproc::cvt_color(mat, &mut bgr, cv::imgproc::COLOR_GRAY2BGR, 0)?,
                4 => cv::imgproc::cvt_color(mat, &mut bgr, cv::imgproc::COLOR_BGRA2BGR, 0)?,
                _ => bgr = mat.try_clone()?,
            }
            if !bgr.is_continuous() {
                bgr = bgr.try_clone()?;
            }
            let width = bgr.cols() as u32;
            let height = bgr.rows() as u32;
            Frame::from_bgr(width, height, bgr.data_bytes()?.to_vec())
        }

        /// Runs `f` with a `Mat` header borrowing this frame's pixels.
        pub fn with_mat<T>(&self, f: impl FnOnce(&Mat) -> Result<T>) -> Result<T> {
            // Safety: the header only lives for the duration of `f`, while `self.data`
            // is borrowed, and is only handed out as a shared reference.
            let mat = unsafe {
                Mat::new_size_with_data(
                    cv::core::Size::new(self.width as i32, self.height as i32),
                    cv::core::CV_8UC3,
                    self.data.as_ptr() as *mut std::ffi::c_void,
                    self.width as usize * CHANNELS,
                )?
            };
            f(&mat)
        }
    }

    impl From<cv::core::Rect> for BoundingBox {
        fn from(rect: cv::core::Rect) -> Self {
            BoundingBox::new(rect.x, rect.y, rect.width, rect.height)
        }
    }

    impl From<Region> for cv::core::Rect {
        fn from(region: Region) -> Self {
            cv::core::Rect::new(region.x, region.y, region.width, region.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_rejects_empty_rectangles() {
        assert!(Region::new(10, 10, 0, 5).is_none());
        assert!(Region::new(10, 10, 5, 0).is_none());
        assert!(Region::new(10, 10, -3, 5).is_none());
        let region = Region::new(10, 20, 30, 40).unwrap();
        assert_eq!(region.max(), (40, 60));
        let far = Region::new(i32::MAX - 1, 5, 10, i32::MAX).unwrap();
        assert_eq!(far.max(), (i32::MAX, i32::MAX));
    }

    #[test]
    fn bounding_box_conversion() {
        let err = Region::try_from(BoundingBox::new(1, 2, 0, 0)).unwrap_err();
        assert!(matches!(err, SessionError::EmptyRegion { .. }));
        let region = Region::try_from(BoundingBox::new(1, 2, 3, 4)).unwrap();
        assert_eq!(BoundingBox::from(region), BoundingBox::new(1, 2, 3, 4));
    }

    #[test]
    fn pixel_access() {
        let mut frame = Frame::new(4, 3);
        frame.set_pixel(3, 2, [1, 2, 3]);
        frame.set_pixel(4, 0, [9, 9, 9]);
        assert_eq!(frame.pixel(3, 2), Some([1, 2, 3]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.pixel(4, 0), None);
        assert!(frame.data().iter().filter(|v| **v == 9).count() == 0);
    }

    #[test]
    fn from_bgr_checks_length() {
        assert!(Frame::from_bgr(2, 2, vec![0; 12]).is_ok());
        assert!(Frame::from_bgr(2, 2, vec![0; 11]).is_err());
    }
}
