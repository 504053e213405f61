use std::path::Path;

use crate::frame::{CaptureRegion, Frame};
use crate::framesource::{FrameSource, SourceError};

/// Serves one still image as every frame. The image is decoded once at
/// construction and kept as RGBA, so this source also exercises the
/// alpha-discard path of the reduction.
pub struct ImageFile {
    frame: Frame,
}

impl ImageFile {
    pub fn new(path: &Path) -> Result<ImageFile, SourceError> {
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        let frame = Frame::from_raw(width as usize, height as usize, 4, image.into_raw());

        Ok(ImageFile { frame })
    }
}

impl FrameSource for ImageFile {
    fn region(&self) -> CaptureRegion {
        CaptureRegion {
            left: 0,
            top: 0,
            width: self.frame.width(),
            height: self.frame.height(),
        }
    }

    fn grab(&mut self) -> Result<Frame, SourceError> {
        Ok(self.frame.clone())
    }
}
