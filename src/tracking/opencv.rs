use super::{Tracker, TrackerFactory, TrackerKind};
use crate::frame::{Frame, Region};
use anyhow::{Context, Result};
use cv::core::{Ptr, Rect, Rect2d};
use cv::prelude::*;
use cv::tracking::{
    legacy_TrackerBoosting, legacy_TrackerBoosting_Params, legacy_TrackerMOSSE,
    legacy_TrackerMedianFlow, legacy_TrackerMedianFlow_Params, legacy_TrackerTLD,
    legacy_TrackerTLD_Params, legacy_TrackerTrait, TrackerCSRT, TrackerCSRT_Params, TrackerKCF,
    TrackerKCF_Params,
};
use cv::video::{TrackerMIL, TrackerMIL_Params};

pub struct OpenCvTracker<T> {
    inner: Ptr<T>,
    last_rect: Rect,
}

impl<T> Tracker for OpenCvTracker<T>
where
    Ptr<T>: TrackerTrait,
{
    fn init(&mut self, frame: &Frame, region: Region) -> Result<()> {
        let rect = Rect::from(region);
        frame.with_mat(|mat| Ok(self.inner.init(mat, rect)?))?;
        self.last_rect = rect;
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<Option<Region>> {
        let mut rect = self.last_rect;
        let found = frame.with_mat(|mat| Ok(self.inner.update(mat, &mut rect)?))?;
        if !found {
            return Ok(None);
        }
        self.last_rect = rect;
        Ok(Region::new(rect.x, rect.y, rect.width, rect.height))
    }
}

/// Tracker from OpenCV's legacy API, which works on floating point boxes.
pub struct LegacyTracker<T> {
    inner: Ptr<T>,
    last_rect: Rect2d,
}

impl<T> Tracker for LegacyTracker<T>
where
    Ptr<T>: legacy_TrackerTrait,
{
    fn init(&mut self, frame: &Frame, region: Region) -> Result<()> {
        let rect = to_rect2d(region);
        let ok = frame.with_mat(|mat| Ok(self.inner.init(mat, rect)?))?;
        anyhow::ensure!(ok, "Tracker rejected region {}", region);
        self.last_rect = rect;
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<Option<Region>> {
        let mut rect = self.last_rect;
        let found = frame.with_mat(|mat| Ok(self.inner.update(mat, &mut rect)?))?;
        if !found {
            return Ok(None);
        }
        self.last_rect = rect;
        Ok(Region::new(
            rect.x.round() as i32,
            rect.y.round() as i32,
            rect.width.round() as i32,
            rect.height.round() as i32,
        ))
    }
}

fn to_rect2d(region: Region) -> Rect2d {
    Rect2d::new(
        region.x() as f64,
        region.y() as f64,
        region.width() as f64,
        region.height() as f64,
    )
}

/// Creates OpenCV trackers of a fixed kind.
pub struct OpenCvTrackerFactory {
    kind: TrackerKind,
}

impl OpenCvTrackerFactory {
    pub fn new(kind: TrackerKind) -> Self {
        Self { kind }
    }
}

impl TrackerFactory for OpenCvTrackerFactory {
    fn create(&self) -> Result<Box<dyn Tracker>> {
        let tracker: Box<dyn Tracker> = match self.kind {
            TrackerKind::Csrt => {
                let params = TrackerCSRT_Params::default()?;
                wrap(TrackerCSRT::create(&params))
            }
            TrackerKind::Kcf => {
                let params = TrackerKCF_Params::default()?;
                wrap(TrackerKCF::create(params))
            }
            TrackerKind::Mil => {
                let params = TrackerMIL_Params::default()?;
                wrap(TrackerMIL::create(params))
            }
            TrackerKind::Boosting => {
                let params = legacy_TrackerBoosting_Params::default()?;
                wrap_legacy(legacy_TrackerBoosting::create(&params))
            }
            TrackerKind::Tld => {
                let params = legacy_TrackerTLD_Params::default()?;
                wrap_legacy(legacy_TrackerTLD::create(&params))
            }
            TrackerKind::MedianFlow => {
                let params = legacy_TrackerMedianFlow_Params::default()?;
                wrap_legacy(legacy_TrackerMedianFlow::create(&params))
            }
            TrackerKind::Mosse => wrap_legacy(legacy_TrackerMOSSE::create()),
        }
        .with_context(|| format!("Failed to create {} tracker", self.kind))?;
        Ok(tracker)
    }
}

fn wrap<T: 'static>(tracker: cv::Result<Ptr<T>>) -> Result<Box<dyn Tracker>>
where
    Ptr<T>: TrackerTrait,
{
    Ok(Box::new(OpenCvTracker {
        inner: tracker?,
        last_rect: Rect::default(),
    }))
}

fn wrap_legacy<T: 'static>(tracker: cv::Result<Ptr<T>>) -> Result<Box<dyn Tracker>>
where
    Ptr<T>: legacy_TrackerTrait,
{
    Ok(Box::new(LegacyTracker {
        inner: tracker?,
        last_rect: Rect2d::default(),
    }))
}
