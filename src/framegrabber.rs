use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::frame::Frame;
use crate::framesource::{FrameSource, SourceError};
use crate::intervaltimer::{IntervalTimer, Pace};

/// The shared handoff point between the grabber and the reduction loops.
/// Publishing swaps in a complete frame behind an Arc; readers clone the Arc
/// and work on an immutable frame, so a grab in progress can never tear a
/// frame that is being reduced.
pub struct FrameBuffer {
    latest: Mutex<Arc<Frame>>,
}

impl FrameBuffer {
    pub fn new(initial: Frame) -> FrameBuffer {
        FrameBuffer {
            latest: Mutex::new(Arc::new(initial)),
        }
    }

    pub fn publish(&self, frame: Frame) {
        *self.latest.lock().unwrap() = Arc::new(frame);
    }

    pub fn latest(&self) -> Arc<Frame> {
        Arc::clone(&self.latest.lock().unwrap())
    }
}

pub struct FrameGrabber {
    source: Box<dyn FrameSource>,
    buffer: Arc<FrameBuffer>,
    running: Arc<AtomicBool>,
    fps: f32,
    suppress_performance_warnings: bool,
}

impl FrameGrabber {
    pub fn new(
        source: Box<dyn FrameSource>,
        buffer: Arc<FrameBuffer>,
        running: Arc<AtomicBool>,
        fps: f32,
        suppress_performance_warnings: bool,
    ) -> FrameGrabber {
        FrameGrabber {
            source,
            buffer,
            running,
            fps,
            suppress_performance_warnings,
        }
    }

    /// Single-shot mode: one acquisition on demand, no pacing. A source error
    /// is the caller's problem.
    pub fn grab_once(&mut self) -> Result<(), SourceError> {
        let frame = self.source.grab()?;
        self.buffer.publish(frame);
        Ok(())
    }

    /// Continuous mode: refill the shared buffer at the target rate until the
    /// running flag is cleared or the source fails. Cancellation is checked
    /// between cycles, never mid-grab.
    pub fn run(&mut self) -> Result<(), SourceError> {
        let mut timer = IntervalTimer::new(self.fps, true);

        while self.running.load(Ordering::Relaxed) {
            self.grab_once()?;

            if let Pace::Overrun { budget, elapsed } = timer.sleep_until_next_tick() {
                if !self.suppress_performance_warnings {
                    log::warn!(
                        "Frame grabber cycle took {:?}, budget is {:?}",
                        elapsed,
                        budget
                    );
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::frame::CaptureRegion;

    /// Counts its grabs, fills every pixel with the grab number and clears the
    /// running flag after a set amount of frames.
    struct StubSource {
        grabs: Arc<AtomicUsize>,
        stop_after: usize,
        running: Arc<AtomicBool>,
    }

    impl FrameSource for StubSource {
        fn region(&self) -> CaptureRegion {
            CaptureRegion {
                left: 0,
                top: 0,
                width: 4,
                height: 2,
            }
        }

        fn grab(&mut self) -> Result<Frame, SourceError> {
            let count = self.grabs.fetch_add(1, Ordering::Relaxed) + 1;
            if count >= self.stop_after {
                self.running.store(false, Ordering::Relaxed);
            }
            Ok(Frame::from_raw(4, 2, 3, vec![count as u8; 4 * 2 * 3]))
        }
    }

    #[test]
    fn publishing_does_not_invalidate_held_frames() {
        let buffer = FrameBuffer::new(Frame::from_raw(1, 1, 3, vec![1, 2, 3]));

        let held = buffer.latest();
        buffer.publish(Frame::from_raw(1, 1, 3, vec![9, 9, 9]));

        assert_eq!(held.channel_at(0, 0, 0), 1);
        assert_eq!(buffer.latest().channel_at(0, 0, 0), 9);
    }

    #[test]
    fn grab_once_publishes_one_frame() {
        let grabs = Arc::new(AtomicUsize::new(0));
        let running = Arc::new(AtomicBool::new(true));
        let buffer = Arc::new(FrameBuffer::new(Frame::new(4, 2, 3)));
        let source = StubSource {
            grabs: Arc::clone(&grabs),
            stop_after: usize::MAX,
            running: Arc::clone(&running),
        };

        let mut grabber =
            FrameGrabber::new(Box::new(source), Arc::clone(&buffer), running, 30.0, false);
        grabber.grab_once().unwrap();

        assert_eq!(grabs.load(Ordering::Relaxed), 1);
        assert_eq!(buffer.latest().channel_at(1, 3, 2), 1);
    }

    #[test]
    fn run_stops_cooperatively_and_publishes_the_last_frame() {
        let grabs = Arc::new(AtomicUsize::new(0));
        let running = Arc::new(AtomicBool::new(true));
        let buffer = Arc::new(FrameBuffer::new(Frame::new(4, 2, 3)));
        let source = StubSource {
            grabs: Arc::clone(&grabs),
            stop_after: 3,
            running: Arc::clone(&running),
        };

        let mut grabber = FrameGrabber::new(
            Box::new(source),
            Arc::clone(&buffer),
            Arc::clone(&running),
            500.0,
            true,
        );
        grabber.run().unwrap();

        assert_eq!(grabs.load(Ordering::Relaxed), 3);
        assert!(!running.load(Ordering::Relaxed));
        assert_eq!(buffer.latest().channel_at(0, 0, 0), 3);
    }

    #[test]
    fn source_errors_end_the_run() {
        struct FailingSource;

        impl FrameSource for FailingSource {
            fn region(&self) -> CaptureRegion {
                CaptureRegion {
                    left: 0,
                    top: 0,
                    width: 1,
                    height: 1,
                }
            }

            fn grab(&mut self) -> Result<Frame, SourceError> {
                Err(SourceError::Capture("device unplugged".to_string()))
            }
        }

        let running = Arc::new(AtomicBool::new(true));
        let buffer = Arc::new(FrameBuffer::new(Frame::new(1, 1, 3)));
        let mut grabber =
            FrameGrabber::new(Box::new(FailingSource), buffer, running, 30.0, false);

        assert!(grabber.run().is_err());
    }
}
