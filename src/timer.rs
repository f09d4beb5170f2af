use std::time::{Duration, Instant};

/// Default cadence for refreshing the on-screen elapsed time
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(10);

/// Periodic deadline polled by the event loop.
///
/// The timer is plain data: it only fires when polled while armed, so once
/// `cancel` has run (or the owner is dropped) no further tick can land.
#[derive(Clone, Copy, Debug)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            // a zero interval would turn the event loop into a busy spin
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true when the deadline has passed, and schedules the next one.
    /// Missed intervals are skipped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new(REFRESH_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disarmed_timer_never_fires() {
        let mut timer = RefreshTimer::default();
        let now = Instant::now();
        assert!(!timer.is_armed());
        assert!(!timer.poll(now + Duration::from_secs(5)));
        assert_eq!(timer.time_until_due(now), None);
    }

    #[test]
    fn test_fires_once_due_and_reschedules() {
        let mut timer = RefreshTimer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        timer.arm(t0);

        assert!(!timer.poll(t0 + Duration::from_millis(5)));
        assert!(timer.poll(t0 + Duration::from_millis(10)));
        // same instant again: already rescheduled
        assert!(!timer.poll(t0 + Duration::from_millis(10)));
        assert!(timer.poll(t0 + Duration::from_millis(20)));
    }

    #[test]
    fn test_skips_missed_intervals() {
        let mut timer = RefreshTimer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        timer.arm(t0);

        assert!(timer.poll(t0 + Duration::from_millis(95)));
        assert_eq!(
            timer.time_until_due(t0 + Duration::from_millis(95)),
            Some(Duration::from_millis(10))
        );
    }

    #[test]
    fn test_cancel_stops_future_ticks() {
        let mut timer = RefreshTimer::new(Duration::from_millis(10));
        let t0 = Instant::now();
        timer.arm(t0);
        timer.cancel();

        assert!(!timer.is_armed());
        assert!(!timer.poll(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let timer = RefreshTimer::new(Duration::ZERO);
        assert_eq!(timer.interval(), Duration::from_millis(1));
    }
}
