use palette::FromColor;

use crate::frame::{CaptureRegion, Frame};
use crate::framesource::{FrameSource, SourceError};

/// Synthetic default source: a horizontal hue sweep that scrolls one column
/// per grab, so the edges keep changing color at the configured frame rate.
pub struct TestPattern {
    region: CaptureRegion,
    tick: usize,
}

impl TestPattern {
    pub fn new(width: usize, height: usize) -> TestPattern {
        TestPattern {
            region: CaptureRegion {
                left: 0,
                top: 0,
                width,
                height,
            },
            tick: 0,
        }
    }
}

impl FrameSource for TestPattern {
    fn region(&self) -> CaptureRegion {
        self.region
    }

    fn grab(&mut self) -> Result<Frame, SourceError> {
        let width = self.region.width;
        let height = self.region.height;
        let mut data = Vec::with_capacity(width * height * 3);

        let mut row_pixels = Vec::with_capacity(width * 3);
        for col in 0..width {
            let hue = ((col + self.tick) % width) as f32 / width as f32 * 360.0;
            let hsv = palette::Hsv::new(hue, 1.0, 1.0);
            let (r, g, b) = palette::Srgb::from_color(hsv).into_format::<u8>().into_components();
            row_pixels.extend_from_slice(&[r, g, b]);
        }
        for _ in 0..height {
            data.extend_from_slice(&row_pixels);
        }

        self.tick = self.tick.wrapping_add(1);
        Ok(Frame::from_raw(width, height, 3, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_the_configured_geometry() {
        let mut source = TestPattern::new(64, 32);

        assert_eq!(source.region().width, 64);
        assert_eq!(source.region().height, 32);

        let frame = source.grab().unwrap();
        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 32);
        assert_eq!(frame.channels(), 3);
    }

    #[test]
    fn pattern_scrolls_between_grabs() {
        let mut source = TestPattern::new(64, 8);

        let first = source.grab().unwrap();
        let second = source.grab().unwrap();
        assert_ne!(first, second);
    }
}
