use crate::frame::{Frame, Region};
use crate::tracking::TrackedObject;
use serde::{Deserialize, Serialize};

/// Outline color (BGR) and thickness in pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub color: [u8; 3],
    pub thickness: u32,
}

impl Stroke {
    pub const fn new(thickness: u32, color: [u8; 3]) -> Self {
        Self { color, thickness }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AnnotationStyle {
    pub tracked: Stroke,
    pub lost: Stroke,
    /// Keep drawing lost objects at their last known region.
    pub draw_lost: bool,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            tracked: Stroke::new(2, [255, 0, 0]),
            lost: Stroke::new(2, [0, 0, 255]),
            draw_lost: true,
        }
    }
}

/// Draws tracked regions onto copies of the decoded frames.
pub struct Annotator {
    style: AnnotationStyle,
}

impl Annotator {
    pub fn new(style: AnnotationStyle) -> Self {
        Self { style }
    }

    /// Returns an annotated copy; `frame` stays untouched for the trackers.
    pub fn render(&self, frame: &Frame, objects: &[TrackedObject]) -> Frame {
        let mut annotated = frame.clone();
        for object in objects {
            let stroke = if object.lost {
                if !self.style.draw_lost {
                    continue;
                }
                self.style.lost
            } else {
                self.style.tracked
            };
            draw_rectangle(&mut annotated, &object.region, stroke);
        }
        annotated
    }
}

/// Draws the outline of `region` from its top left corner to `region.max()`, growing
/// inwards with the stroke thickness. Parts outside of the frame are clipped.
pub fn draw_rectangle(frame: &mut Frame, region: &Region, stroke: Stroke) {
    let (x_max, y_max) = region.max();
    let (width, height) = (frame.width() as i32, frame.height() as i32);
    for inset in 0..stroke.thickness as i32 {
        let (x0, y0) = (region.x().saturating_add(inset), region.y().saturating_add(inset));
        let (x1, y1) = (x_max.saturating_sub(inset), y_max.saturating_sub(inset));
        if x0 > x1 || y0 > y1 {
            break;
        }
        for x in x0.max(0)..=x1.min(width - 1) {
            put(frame, x, y0, stroke.color);
            put(frame, x, y1, stroke.color);
        }
        for y in y0.max(0)..=y1.min(height - 1) {
            put(frame, x0, y, stroke.color);
            put(frame, x1, y, stroke.color);
        }
    }
}

fn put(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 {
        frame.set_pixel(x as u32, y as u32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: [u8; 3] = [255, 0, 0];
    const BLACK: [u8; 3] = [0, 0, 0];

    #[test]
    fn huge_region_is_clipped() {
        let mut frame = Frame::new(20, 20);
        let region = Region::new(5, 5, i32::MAX, i32::MAX).unwrap();
        draw_rectangle(&mut frame, &region, Stroke::new(2, BLUE));
        assert_eq!(frame.pixel(5, 5), Some(BLUE));
        assert_eq!(frame.pixel(19, 6), Some(BLUE));
        assert_eq!(frame.pixel(19, 19), Some(BLACK));
        assert_eq!(frame.pixel(7, 7), Some(BLACK));
    }

    #[test]
    fn outline_covers_border_only() {
        let mut frame = Frame::new(50, 50);
        let region = Region::new(10, 10, 20, 15).unwrap();
        draw_rectangle(&mut frame, &region, Stroke::new(2, BLUE));
        assert_eq!(frame.pixel(10, 10), Some(BLUE));
        assert_eq!(frame.pixel(30, 25), Some(BLUE));
        assert_eq!(frame.pixel(11, 20), Some(BLUE));
        assert_eq!(frame.pixel(29, 24), Some(BLUE));
        assert_eq!(frame.pixel(12, 20), Some(BLACK));
        assert_eq!(frame.pixel(20, 17), Some(BLACK));
        assert_eq!(frame.pixel(9, 10), Some(BLACK));
        assert_eq!(frame.pixel(31, 25), Some(BLACK));
    }

    #[test]
    fn clips_at_frame_border() {
        let mut frame = Frame::new(20, 20);
        let region = Region::new(-5, 15, 40, 40).unwrap();
        draw_rectangle(&mut frame, &region, Stroke::new(1, BLUE));
        assert_eq!(frame.pixel(0, 15), Some(BLUE));
        assert_eq!(frame.pixel(19, 15), Some(BLUE));
        assert_eq!(frame.pixel(0, 16), Some(BLACK));
    }

    #[test]
    fn thick_stroke_on_small_region() {
        let mut frame = Frame::new(10, 10);
        let region = Region::new(2, 2, 2, 2).unwrap();
        draw_rectangle(&mut frame, &region, Stroke::new(5, BLUE));
        for y in 2..=4 {
            for x in 2..=4 {
                assert_eq!(frame.pixel(x, y), Some(BLUE));
            }
        }
        assert_eq!(frame.pixel(5, 5), Some(BLACK));
    }
}
