#[cfg(feature = "opencv")]
pub mod opencv;

use crate::frame::{Frame, Region};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[cfg(feature = "opencv")]
pub use self::opencv::OpenCvTrackerFactory;

/// Visual tracking algorithm bound to a single object.
pub trait Tracker {
    fn init(&mut self, frame: &Frame, region: Region) -> Result<()>;
    /// Returns `None` if the target was lost in this frame.
    fn update(&mut self, frame: &Frame) -> Result<Option<Region>>;
}

pub trait TrackerFactory {
    fn create(&self) -> Result<Box<dyn Tracker>>;
}

impl<F> TrackerFactory for F
where
    F: Fn() -> Result<Box<dyn Tracker>>,
{
    fn create(&self) -> Result<Box<dyn Tracker>> {
        self()
    }
}

#[derive(Serialize, Deserialize, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackerKind {
    /// Discriminative correlation filter with channel and spatial reliability
    #[default]
    Csrt,
    /// Kernelized correlation filter
    Kcf,
    /// Multiple instance learning
    Mil,
    /// Online AdaBoost (legacy)
    Boosting,
    /// Tracking, learning and detection (legacy)
    Tld,
    /// Forward-backward error of median flow (legacy)
    #[value(name = "medianflow")]
    MedianFlow,
    /// Minimum output sum of squared error filter (legacy)
    Mosse,
}

impl std::fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrackerKind::Csrt => "CSRT",
            TrackerKind::Kcf => "KCF",
            TrackerKind::Mil => "MIL",
            TrackerKind::Boosting => "BOOSTING",
            TrackerKind::Tld => "TLD",
            TrackerKind::MedianFlow => "MEDIANFLOW",
            TrackerKind::Mosse => "MOSSE",
        };
        f.write_str(name)
    }
}

/// Registration index of a tracked object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackOutcome {
    Tracked(Region),
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackResult {
    pub id: ObjectId,
    pub outcome: TrackOutcome,
}

pub struct TrackedObject {
    pub id: ObjectId,
    /// Last region reported by the tracker.
    pub region: Region,
    pub lost: bool,
    tracker: Box<dyn Tracker>,
}

/// Independent trackers, one per selected region. Objects are never removed.
pub struct TrackerPool {
    factory: Box<dyn TrackerFactory>,
    objects: Vec<TrackedObject>,
}

impl TrackerPool {
    pub fn new(factory: Box<dyn TrackerFactory>) -> Self {
        Self {
            factory,
            objects: vec![],
        }
    }

    pub fn add_region(&mut self, frame: &Frame, region: Region) -> Result<ObjectId> {
        let mut tracker = self.factory.create()?;
        tracker.init(frame, region)?;
        let id = ObjectId(self.objects.len());
        self.objects.push(TrackedObject {
            id,
            region,
            lost: false,
            tracker,
        });
        metrics::gauge!("count.tracked_objects", self.objects.len() as f64);
        log::info!("Tracking object {} at {}", id, region);
        Ok(id)
    }

    /// Updates every tracker with `frame`. Yields exactly one result per object, in
    /// registration order. A failing tracker only marks its own object as lost.
    pub fn advance_all(&mut self, frame: &Frame) -> Vec<TrackResult> {
        self.objects
            .iter_mut()
            .map(|object| {
                let update = match object.tracker.update(frame) {
                    Ok(update) => update,
                    Err(e) => {
                        log::error!("Tracker {} failed: {}", object.id, e);
                        None
                    }
                };
                let outcome = match update {
                    Some(region) => {
                        if object.lost {
                            log::info!("Object {} reacquired at {}", object.id, region);
                        }
                        object.region = region;
                        object.lost = false;
                        TrackOutcome::Tracked(region)
                    }
                    None => {
                        if !object.lost {
                            metrics::increment_counter!("count.trackers_lost");
                            log::warn!("Lost object {} near {}", object.id, object.region);
                        }
                        object.lost = true;
                        TrackOutcome::Lost
                    }
                };
                TrackResult {
                    id: object.id,
                    outcome,
                }
            })
            .collect()
    }

    pub fn objects(&self) -> &[TrackedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn lost_count(&self) -> usize {
        self.objects.iter().filter(|o| o.lost).count()
    }
}
