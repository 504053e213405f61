use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use palette::Srgb;

use crate::cutout::{Axis, Cutout};
use crate::devices::DeviceBinding;
use crate::frame::Frame;
use crate::framegrabber::{FrameBuffer, FrameGrabber};
use crate::intervaltimer::{IntervalTimer, Pace};
use crate::olaoutput::OlaOutput;

/// Reduces the frame band a device is bound to into one color per LED.
///
/// The band is collapsed along its cutout axis by averaging (alpha, if the
/// frame carries it, is ignored), the resulting strip of averaged pixels is
/// split into `leds` contiguous chunks with the leading chunks taking the
/// remainder, each chunk is averaged into one color and the sequence is
/// reversed, since LED strips are wired against the pixel traversal
/// direction.
///
/// Degenerate geometry does not fail: an empty band, or more LEDs than the
/// strip has pixels, yields black for the samples nothing maps to.
pub fn reduce(frame: &Frame, binding: &DeviceBinding) -> Vec<Srgb> {
    let strip = collapse_band(frame, &binding.cutout);
    let mut samples = average_chunks(&strip, binding.leds);
    samples.reverse();

    samples
        .into_iter()
        .map(|[r, g, b]| Srgb::new(r / 255.0, g / 255.0, b / 255.0))
        .collect()
}

fn mean_pixel(frame: &Frame, rows: Range<usize>, cols: Range<usize>) -> [f32; 3] {
    let count = rows.len() * cols.len();

    let mut acc = [0.0f32; 3];
    for row in rows {
        for col in cols.clone() {
            for (ch, sum) in acc.iter_mut().enumerate() {
                *sum += frame.channel_at(row, col, ch) as f32;
            }
        }
    }

    if count > 0 {
        for sum in &mut acc {
            *sum /= count as f32;
        }
    }
    acc
}

/// Averages the cutout's axis away: one pixel per position along the other
/// axis, so a side band becomes one pixel per row and a top/bottom band one
/// per column.
fn collapse_band(frame: &Frame, cutout: &Cutout) -> Vec<[f32; 3]> {
    let extent = frame.axis_len(cutout.axis);
    let lower = cutout.lower.min(extent);
    let upper = cutout.upper.min(extent);

    match cutout.axis {
        Axis::Columns => (0..frame.height())
            .map(|row| mean_pixel(frame, row..row + 1, lower..upper))
            .collect(),
        Axis::Rows => (0..frame.width())
            .map(|col| mean_pixel(frame, lower..upper, col..col + 1))
            .collect(),
    }
}

/// As-equal-as-possible contiguous partition: the first `len % chunks` chunks
/// get one element more, sizes never differ by more than one.
fn chunk_sizes(len: usize, chunks: usize) -> Vec<usize> {
    let base = len / chunks;
    let extra = len % chunks;
    (0..chunks).map(|i| base + usize::from(i < extra)).collect()
}

fn average_chunks(strip: &[[f32; 3]], leds: usize) -> Vec<[f32; 3]> {
    let mut samples = Vec::with_capacity(leds);
    let mut offset = 0;

    for size in chunk_sizes(strip.len(), leds) {
        let chunk = &strip[offset..offset + size];
        offset += size;

        let mut acc = [0.0f32; 3];
        for value in chunk {
            for (ch, sum) in acc.iter_mut().enumerate() {
                *sum += value[ch];
            }
        }
        if !chunk.is_empty() {
            for sum in &mut acc {
                *sum /= chunk.len() as f32;
            }
        }
        samples.push(acc);
    }

    samples
}

/// The output side of the pipeline: on its own cadence, reduce the current
/// frame for every bound device and ship the universe to OLA.
pub struct Photonizer {
    buffer: Arc<FrameBuffer>,
    bindings: Vec<DeviceBinding>,
    ola: OlaOutput,
    grabber: Option<FrameGrabber>,
    running: Arc<AtomicBool>,
    fps: f32,
    suppress_performance_warnings: bool,
}

impl Photonizer {
    /// Pass a grabber to run single-threaded: one acquisition per output tick
    /// instead of an independent grabber loop.
    pub fn new(
        buffer: Arc<FrameBuffer>,
        bindings: Vec<DeviceBinding>,
        ola: OlaOutput,
        grabber: Option<FrameGrabber>,
        running: Arc<AtomicBool>,
        fps: f32,
        suppress_performance_warnings: bool,
    ) -> Photonizer {
        Photonizer {
            buffer,
            bindings,
            ola,
            grabber,
            running,
            fps,
            suppress_performance_warnings,
        }
    }

    pub fn run(&mut self) {
        let mut timer = IntervalTimer::new(self.fps, true);

        while self.running.load(Ordering::Relaxed) {
            self.update();

            if let Pace::Overrun { budget, elapsed } = timer.sleep_until_next_tick() {
                if !self.suppress_performance_warnings {
                    log::warn!("Photonizer cycle took {:?}, budget is {:?}", elapsed, budget);
                }
            }
        }
    }

    fn update(&mut self) {
        if let Some(grabber) = self.grabber.as_mut() {
            if let Err(err) = grabber.grab_once() {
                log::error!("Frame source failed: {}", err);
                self.running.store(false, Ordering::Relaxed);
                return;
            }
        }

        let frame = self.buffer.latest();
        for binding in &self.bindings {
            let colors = reduce(&frame, binding);
            self.ola.write_strip(binding.channel, &colors);
        }
        self.ola.flush();
    }
}
