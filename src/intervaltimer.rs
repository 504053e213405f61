use std::thread;
use std::time::{Duration, Instant};

/// How the cycle that just finished relates to its time budget.
pub enum Pace {
    OnSchedule,
    Overrun { budget: Duration, elapsed: Duration },
}

pub struct IntervalTimer {
    interval: Duration,
    last_tick: Instant,
    thread_name: String,
    measure_fps: bool,
    last_fps_print: Instant,
    frames: u32,
}

impl IntervalTimer {
    pub fn new(freq_hz: f32, measure_fps: bool) -> IntervalTimer {
        let frame_duration_microsec = 1000.0 / freq_hz * 1000.0;
        let cur_thread = thread::current();
        let thread_name = if let Some(name) = cur_thread.name() {
            name
        } else {
            "unnamed"
        };

        IntervalTimer {
            interval: Duration::from_micros(frame_duration_microsec as u64),
            last_tick: Instant::now(),
            thread_name: thread_name.to_string(),
            measure_fps,
            last_fps_print: Instant::now(),
            frames: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps away whatever remains of the current cycle. If the cycle already
    /// blew its budget, returns immediately and starts the next cycle now
    /// instead of trying to catch up; the caller decides whether that is worth
    /// a warning.
    pub fn sleep_until_next_tick(&mut self) -> Pace {
        if self.measure_fps {
            self.update_fps();
        }

        let now = Instant::now();
        let next_tick = self.last_tick + self.interval;

        if next_tick > now {
            thread::sleep(next_tick - now);
            self.last_tick = next_tick;
            return Pace::OnSchedule;
        }

        let elapsed = now - self.last_tick;
        self.last_tick = now;
        Pace::Overrun {
            budget: self.interval,
            elapsed,
        }
    }

    fn update_fps(&mut self) {
        self.frames += 1;

        if Instant::now() - self.last_fps_print > Duration::from_secs(1) {
            log::debug!("{} FPS: {}", self.thread_name, self.frames);
            self.frames = 0;
            self.last_fps_print = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_cycle_sleeps_the_remainder() {
        let mut timer = IntervalTimer::new(20.0, false);

        let started = Instant::now();
        let pace = timer.sleep_until_next_tick();
        let waited = started.elapsed();

        assert!(matches!(pace, Pace::OnSchedule));
        // 50ms budget, nothing was done, so most of it is slept away.
        assert!(waited >= Duration::from_millis(30), "waited {:?}", waited);
    }

    #[test]
    fn slow_cycle_reports_an_overrun_and_does_not_block() {
        let mut timer = IntervalTimer::new(100.0, false);
        thread::sleep(Duration::from_millis(25));

        let started = Instant::now();
        let pace = timer.sleep_until_next_tick();
        let returned_after = started.elapsed();

        match pace {
            Pace::Overrun { budget, elapsed } => {
                assert_eq!(budget, Duration::from_millis(10));
                assert!(elapsed >= Duration::from_millis(25), "elapsed {:?}", elapsed);
            }
            Pace::OnSchedule => panic!("expected an overrun"),
        }
        // No catch-up sleep after a blown budget
        assert!(
            returned_after < Duration::from_millis(10),
            "took {:?}",
            returned_after
        );
    }

    #[test]
    fn recovers_after_an_overrun() {
        let mut timer = IntervalTimer::new(100.0, false);
        thread::sleep(Duration::from_millis(15));

        assert!(matches!(timer.sleep_until_next_tick(), Pace::Overrun { .. }));
        assert!(matches!(timer.sleep_until_next_tick(), Pace::OnSchedule));
    }
}
