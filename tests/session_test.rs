use anyhow::Result;
use multitrack::{
    AnnotationStyle, BoundingBox, EncoderSettings, Frame, Interaction, Region, SessionLoop,
    SessionSettings, Signal, StopReason, Tracker, TrackerFactory, VideoSink, VideoSource,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;
const BLUE: [u8; 3] = [255, 0, 0];
const GRAY: [u8; 3] = [40, 40, 40];

/// Synthetic video of uniformly gray frames.
struct SyntheticSource {
    remaining: usize,
}

impl VideoSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        let mut frame = Frame::new(WIDTH, HEIGHT);
        frame.fill(GRAY);
        Ok(Some(frame))
    }
}

/// Selects one region on the first frame and never presses a key.
struct OneSelection(BoundingBox);

impl Interaction for OneSelection {
    fn select_many(&mut self, _frame: &Frame) -> Result<Vec<BoundingBox>> {
        Ok(vec![self.0])
    }

    fn select_one(&mut self, _frame: &Frame) -> Result<Option<BoundingBox>> {
        Ok(None)
    }

    fn show(&mut self, _frame: &Frame) -> Result<()> {
        Ok(())
    }

    fn poll_signal(&mut self) -> Result<Signal> {
        Ok(Signal::None)
    }
}

struct Recorder(Rc<RefCell<Vec<Frame>>>);

impl VideoSink for Recorder {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        self.0.borrow_mut().push(frame.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Ignores the frames and always reports the same region.
struct FixedTracker(Region);

impl Tracker for FixedTracker {
    fn init(&mut self, _frame: &Frame, _region: Region) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, _frame: &Frame) -> Result<Option<Region>> {
        Ok(Some(self.0))
    }
}

fn is_outline_pixel(region: &Region, x: i32, y: i32, thickness: i32) -> bool {
    let (x_max, y_max) = region.max();
    let inside = x >= region.x() && x <= x_max && y >= region.y() && y <= y_max;
    let inner = x >= region.x() + thickness
        && x <= x_max - thickness
        && y >= region.y() + thickness
        && y <= y_max - thickness;
    inside && !inner
}

#[test]
fn test_ten_frames_one_fixed_region() {
    let fixed = Region::new(12, 8, 20, 16).unwrap();
    let frames = Rc::new(RefCell::new(vec![]));
    let recorded = frames.clone();
    let factory: Box<dyn TrackerFactory> =
        Box::new(move || -> Result<Box<dyn Tracker>> { Ok(Box::new(FixedTracker(fixed))) });
    let settings = SessionSettings {
        source: PathBuf::from("synthetic.mp4"),
        recording: PathBuf::from("results/tracked.mp4"),
        fps: 10.0,
        style: AnnotationStyle::default(),
    };

    let session = SessionLoop::new(
        SyntheticSource { remaining: 10 },
        OneSelection(BoundingBox::from(fixed)),
        factory,
        move |encoder: &EncoderSettings| -> Result<Recorder> {
            assert_eq!((encoder.width, encoder.height), (WIDTH, HEIGHT));
            Ok(Recorder(recorded.clone()))
        },
        settings,
    );
    let report = session.run().unwrap();

    assert_eq!(report.stop_reason, StopReason::EndOfStream);
    assert_eq!(report.frames_written, 10);
    assert_eq!(report.tracked_objects, 1);
    assert_eq!(report.lost_objects, 0);

    let frames = frames.borrow();
    assert_eq!(frames.len(), 10);
    for frame in frames.iter() {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let expected = if is_outline_pixel(&fixed, x as i32, y as i32, 2) {
                    BLUE
                } else {
                    GRAY
                };
                assert_eq!(frame.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }
}
