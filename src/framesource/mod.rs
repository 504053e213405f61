pub mod imagefile;
pub mod noise;
pub mod testpattern;

use thiserror::Error;

use crate::frame::{CaptureRegion, Frame};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read image: {0}")]
    Image(#[from] image::ImageError),
    #[error("capture failed: {0}")]
    Capture(String),
}

/// Something that can hand out one frame per request, fast enough to sustain
/// the configured frame rate. Screen and video backends implement this
/// downstream; the bundled sources are synthetic or file-backed.
pub trait FrameSource: Send {
    /// The pixel area this source delivers. Queried once at startup; the
    /// geometry must not change afterwards.
    fn region(&self) -> CaptureRegion;

    fn grab(&mut self) -> Result<Frame, SourceError>;
}
