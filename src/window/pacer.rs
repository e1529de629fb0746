//! Frame pacing of the event loop.

use std::time::Duration;

use web_time::Instant;

/// Frame rate assumed when the monitor does not report its refresh rate.
pub const DEFAULT_REFRESH_RATE_HZ: f64 = 60.0;

/// Spaces frames at least one frame interval apart.
#[derive(Debug, Copy, Clone)]
pub struct FramePacer {
    interval: Duration,
    next_frame: Instant,
}

impl FramePacer {
    /// A pacer whose first frame is due at `now`.
    pub fn new(interval: Duration, now: Instant) -> FramePacer {
        FramePacer {
            interval,
            next_frame: now,
        }
    }

    /// A pacer for a display refreshing at `millihertz`, or at
    /// [`DEFAULT_REFRESH_RATE_HZ`] if unknown.
    pub fn from_refresh_rate(millihertz: Option<u32>, now: Instant) -> FramePacer {
        let hz = millihertz
            .filter(|&mhz| mhz > 0)
            .map_or(DEFAULT_REFRESH_RATE_HZ, |mhz| mhz as f64 / 1000.0);
        FramePacer::new(Duration::from_secs_f64(1.0 / hz), now)
    }

    /// The minimum time between two frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How long to wait at `now` before the next frame is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }

    /// Starts a frame if one is due at `now`.
    ///
    /// A late frame pushes the next one a full interval away instead of
    /// letting frames bunch up to catch up.
    pub fn try_start_frame(&mut self, now: Instant) -> bool {
        if now < self.next_frame {
            return false;
        }

        self.next_frame = if now.duration_since(self.next_frame) > self.interval {
            now + self.interval
        } else {
            self.next_frame + self.interval
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn frames_are_spaced_by_the_interval() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(FRAME, start);

        assert_eq!(pacer.timeout(start), Duration::ZERO);
        assert!(pacer.try_start_frame(start));

        assert!(!pacer.try_start_frame(start));
        assert!(!pacer.try_start_frame(start + Duration::from_millis(10)));
        assert_eq!(pacer.timeout(start + Duration::from_millis(10)), Duration::from_millis(6));

        assert!(pacer.try_start_frame(start + FRAME));
        assert!(!pacer.try_start_frame(start + FRAME));
    }

    #[test]
    fn late_frames_do_not_bunch_up() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(FRAME, start);
        assert!(pacer.try_start_frame(start));

        let late = start + Duration::from_millis(100);
        assert!(pacer.try_start_frame(late));
        assert!(!pacer.try_start_frame(late + Duration::from_millis(1)));
        assert_eq!(pacer.timeout(late), FRAME);
    }

    #[test]
    fn interval_follows_the_refresh_rate() {
        let now = Instant::now();

        let pacer = FramePacer::from_refresh_rate(Some(120_000), now);
        assert!((pacer.interval().as_secs_f64() - 1.0 / 120.0).abs() < 1.0e-9);

        for unknown in [None, Some(0)] {
            let pacer = FramePacer::from_refresh_rate(unknown, now);
            assert!((pacer.interval().as_secs_f64() - 1.0 / 60.0).abs() < 1.0e-9);
        }
    }
}
