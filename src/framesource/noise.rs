use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::frame::{CaptureRegion, Frame};
use crate::framesource::{FrameSource, SourceError};

/// Uniform random pixels. Useful as a worst case for the reduction: no two
/// adjacent pixels agree, every channel changes every frame.
pub struct Noise {
    region: CaptureRegion,
    rng: StdRng,
}

impl Noise {
    pub fn new(width: usize, height: usize) -> Noise {
        Noise {
            region: CaptureRegion {
                left: 0,
                top: 0,
                width,
                height,
            },
            rng: StdRng::from_entropy(),
        }
    }
}

impl FrameSource for Noise {
    fn region(&self) -> CaptureRegion {
        self.region
    }

    fn grab(&mut self) -> Result<Frame, SourceError> {
        let mut data = vec![0u8; self.region.width * self.region.height * 3];
        self.rng.fill_bytes(&mut data);
        Ok(Frame::from_raw(self.region.width, self.region.height, 3, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_the_configured_geometry() {
        let mut source = Noise::new(32, 16);

        let frame = source.grab().unwrap();
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 16);
        assert_eq!(frame.channels(), 3);
    }
}
