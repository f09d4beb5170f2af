use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};

use crate::celebration::pick_flavor;
use crate::clock::{Clock, SystemClock};
use crate::target::Target;
use crate::timer::{RefreshTimer, REFRESH_INTERVAL};

/// Number of accepted clicks that completes a round
pub const TARGETS_PER_ROUND: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Waiting,
    Playing,
    Finished,
}

/// What a click on the current target did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// The inert pre-game target was clicked and the clock is running
    Started,
    /// A target was hit mid-round; carries the new hit count
    Hit(u32),
    /// The tenth hit landed; carries the final time
    Finished(Duration),
    /// No target to click in this phase
    Ignored,
}

pub fn format_secs(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}

/// One round of the aim game: ten targets, one clock.
#[derive(Debug)]
pub struct AimSession<C: Clock = SystemClock> {
    phase: Phase,
    hits: u32,
    started_at: Option<Instant>,
    elapsed: Duration,
    target: Option<Target>,
    celebrating: bool,
    flavor_text: Option<String>,
    flavor_pool: Vec<String>,
    refresh: RefreshTimer,
    rng: StdRng,
    clock: C,
}

impl AimSession<SystemClock> {
    pub fn new() -> Self {
        Self::with_parts(SystemClock, StdRng::from_entropy(), REFRESH_INTERVAL)
    }
}

impl Default for AimSession<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> AimSession<C> {
    /// Builds a session already reset into `Waiting`.
    pub fn with_parts(clock: C, rng: StdRng, refresh_interval: Duration) -> Self {
        let mut session = Self {
            phase: Phase::Waiting,
            hits: 0,
            started_at: None,
            elapsed: Duration::ZERO,
            target: None,
            celebrating: false,
            flavor_text: None,
            flavor_pool: Vec::new(),
            refresh: RefreshTimer::new(refresh_interval),
            rng,
            clock,
        };
        session.reset();
        session
    }

    /// Replaces the flavor lines picked from on completion. An empty pool
    /// falls back to the built-in lines.
    pub fn with_pool(mut self, pool: Vec<String>) -> Self {
        self.flavor_pool = pool;
        self
    }

    pub fn reset(&mut self) {
        self.refresh.cancel();
        log::debug!("session reset from {}", self.phase);
        self.phase = Phase::Waiting;
        self.target = Some(Target::random(&mut self.rng));
        self.started_at = None;
        self.hits = 0;
        self.elapsed = Duration::ZERO;
        self.celebrating = false;
        self.flavor_text = None;
    }

    pub fn click_target(&mut self) -> ClickOutcome {
        match self.phase {
            Phase::Waiting => {
                self.start();
                ClickOutcome::Started
            }
            Phase::Playing if self.hits + 1 >= TARGETS_PER_ROUND => {
                let final_time = self.finish();
                ClickOutcome::Finished(final_time)
            }
            Phase::Playing => {
                self.hits += 1;
                self.target = Some(Target::random(&mut self.rng));
                log::trace!("hit {}/{}", self.hits, TARGETS_PER_ROUND);
                ClickOutcome::Hit(self.hits)
            }
            Phase::Finished => ClickOutcome::Ignored,
        }
    }

    fn start(&mut self) {
        let now = self.clock.now();
        self.phase = Phase::Playing;
        self.started_at = Some(now);
        self.hits = 1;
        self.target = Some(Target::random(&mut self.rng));
        self.elapsed = Duration::ZERO;
        self.celebrating = false;
        self.flavor_text = None;
        self.refresh.arm(now);
        log::debug!("session started");
    }

    fn finish(&mut self) -> Duration {
        let now = self.clock.now();
        self.refresh.cancel();
        self.phase = Phase::Finished;
        self.hits = TARGETS_PER_ROUND;
        self.target = None;
        self.elapsed = self
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        self.celebrating = true;
        self.flavor_text = Some(pick_flavor(&mut self.rng, &self.flavor_pool));
        log::info!("round finished in {}s", format_secs(self.elapsed));
        self.elapsed
    }

    /// Refreshes the displayed elapsed time when the refresh timer is due.
    /// Returns true when there is something new to draw.
    pub fn on_tick(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let now = self.clock.now();
        if !self.refresh.poll(now) {
            return false;
        }
        if let Some(start) = self.started_at {
            self.elapsed = self.elapsed.max(now.saturating_duration_since(start));
        }
        true
    }

    /// How long the event loop may sleep before the next refresh is due
    pub fn next_refresh_in(&self) -> Option<Duration> {
        self.refresh.time_until_due(self.clock.now())
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_armed()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Every target currently on the field: the inert one while waiting, the
    /// live one while playing, none once finished
    pub fn targets(&self) -> &[Target] {
        self.target.as_slice()
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn flavor_text(&self) -> Option<&str> {
        self.flavor_text.as_deref()
    }

    pub fn status_line(&self) -> String {
        match self.phase {
            Phase::Waiting => "click the target to start".to_string(),
            Phase::Playing => format!(
                "hits: {}/{} | time: {}s",
                self.hits,
                TARGETS_PER_ROUND,
                format_secs(self.elapsed)
            ),
            Phase::Finished => format!("final time: {} seconds", format_secs(self.elapsed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::target::MAX_COORD;
    use assert_matches::assert_matches;

    fn session() -> (AimSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let session =
            AimSession::with_parts(clock.clone(), StdRng::seed_from_u64(3), REFRESH_INTERVAL);
        (session, clock)
    }

    fn assert_fresh_waiting(s: &AimSession<ManualClock>) {
        assert_eq!(s.phase(), Phase::Waiting);
        assert_eq!(s.hits(), 0);
        assert_eq!(s.elapsed(), Duration::ZERO);
        assert!(!s.is_celebrating());
        assert_eq!(s.flavor_text(), None);
        assert_eq!(s.targets().len(), 1);
        assert!(!s.is_refreshing());
    }

    #[test]
    fn test_new_session_is_waiting_with_inert_target() {
        let (s, _) = session();
        assert_fresh_waiting(&s);
        assert_eq!(s.status_line(), "click the target to start");
    }

    #[test]
    fn test_first_click_starts_playing() {
        let (mut s, _) = session();
        let inert = *s.target().unwrap();

        assert_matches!(s.click_target(), ClickOutcome::Started);

        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.hits(), 1);
        assert_eq!(s.targets().len(), 1);
        assert_ne!(*s.target().unwrap(), inert);
        assert!(s.is_refreshing());
        assert_eq!(s.status_line(), "hits: 1/10 | time: 0.00s");
    }

    #[test]
    fn test_full_round_scenario() {
        let (mut s, clock) = session();
        s.click_target();

        for expected in 2..=9 {
            clock.advance(Duration::from_millis(100));
            assert_matches!(s.click_target(), ClickOutcome::Hit(n) if n == expected);
            assert_eq!(s.phase(), Phase::Playing);
            assert_eq!(s.targets().len(), 1);
        }
        assert_eq!(s.hits(), 9);

        clock.advance(Duration::from_millis(150));
        let outcome = s.click_target();

        assert_matches!(outcome, ClickOutcome::Finished(t) if t == Duration::from_millis(950));
        assert_eq!(s.phase(), Phase::Finished);
        assert_eq!(s.hits(), 10);
        assert!(s.targets().is_empty());
        assert!(s.is_celebrating());
        assert!(s.flavor_text().is_some_and(|f| !f.is_empty()));
        assert!(!s.is_refreshing());
        assert_eq!(s.status_line(), "final time: 0.95 seconds");
    }

    #[test]
    fn test_hits_increase_by_one_and_never_exceed_ten() {
        let (mut s, _) = session();
        let mut last = s.hits();
        for _ in 0..25 {
            s.click_target();
            let now = s.hits();
            if s.phase() == Phase::Playing {
                assert_eq!(now, last + 1);
            }
            assert!(now <= TARGETS_PER_ROUND);
            last = now;
        }
        assert_eq!(s.phase(), Phase::Finished);
    }

    #[test]
    fn test_targets_always_inside_field() {
        let (mut s, _) = session();
        for _ in 0..20 {
            for _ in 0..10 {
                for t in s.targets() {
                    assert!((0.0..MAX_COORD).contains(&t.x));
                    assert!((0.0..MAX_COORD).contains(&t.y));
                }
                s.click_target();
            }
            s.reset();
        }
    }

    #[test]
    fn test_clicks_after_finish_are_ignored() {
        let (mut s, clock) = session();
        for _ in 0..10 {
            s.click_target();
        }
        let frozen = s.elapsed();

        clock.advance(Duration::from_secs(3));
        assert_matches!(s.click_target(), ClickOutcome::Ignored);
        assert_eq!(s.hits(), 10);
        assert_eq!(s.elapsed(), frozen);
    }

    #[test]
    fn test_tick_refreshes_elapsed_while_playing() {
        let (mut s, clock) = session();
        assert!(!s.on_tick());

        s.click_target();
        clock.advance(Duration::from_millis(5));
        assert!(!s.on_tick(), "refresh not due yet");

        clock.advance(Duration::from_millis(20));
        assert!(s.on_tick());
        assert_eq!(s.elapsed(), Duration::from_millis(25));
        assert_eq!(s.next_refresh_in(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_elapsed_is_monotonic_while_playing() {
        let (mut s, clock) = session();
        s.click_target();
        let mut last = s.elapsed();
        for _ in 0..50 {
            clock.advance(Duration::from_millis(7));
            s.on_tick();
            assert!(s.elapsed() >= last);
            last = s.elapsed();
        }
    }

    #[test]
    fn test_final_time_ignores_refresh_loop_and_stays_frozen() {
        let (mut s, clock) = session();
        s.click_target();
        // never tick: the final time must still be exact
        clock.advance(Duration::from_millis(1234));
        for _ in 0..9 {
            s.click_target();
        }
        assert_eq!(s.elapsed(), Duration::from_millis(1234));

        clock.advance(Duration::from_secs(10));
        assert!(!s.on_tick());
        assert_eq!(s.elapsed(), Duration::from_millis(1234));
        assert_eq!(s.next_refresh_in(), None);
    }

    #[test]
    fn test_reset_from_finished() {
        let (mut s, _) = session();
        for _ in 0..10 {
            s.click_target();
        }
        s.reset();
        assert_fresh_waiting(&s);
    }

    #[test]
    fn test_reset_mid_round_cancels_refresh() {
        let (mut s, clock) = session();
        s.click_target();
        s.click_target();
        s.reset();

        clock.advance(Duration::from_secs(1));
        assert!(!s.on_tick());
        assert_fresh_waiting(&s);
    }

    #[test]
    fn test_rapid_resets() {
        let (mut s, _) = session();
        for _ in 0..10 {
            s.click_target();
        }
        s.reset();
        assert_fresh_waiting(&s);
        s.reset();
        assert_fresh_waiting(&s);
    }

    #[test]
    fn test_restart_after_reset_begins_new_round() {
        let (mut s, clock) = session();
        for _ in 0..10 {
            s.click_target();
        }
        s.reset();
        clock.advance(Duration::from_secs(5));

        s.click_target();
        clock.advance(Duration::from_millis(300));
        for _ in 0..9 {
            s.click_target();
        }
        assert_eq!(s.elapsed(), Duration::from_millis(300));
    }

    #[test]
    fn test_custom_flavor_pool() {
        let clock = ManualClock::new();
        let mut s = AimSession::with_parts(clock, StdRng::seed_from_u64(5), REFRESH_INTERVAL)
            .with_pool(vec!["only line".to_string()]);
        for _ in 0..10 {
            s.click_target();
        }
        assert_eq!(s.flavor_text(), Some("only line"));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Waiting.to_string(), "waiting");
        assert_eq!(Phase::Playing.to_string(), "playing");
        assert_eq!(Phase::Finished.to_string(), "finished");
    }

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(Duration::from_millis(4567)), "4.57");
        assert_eq!(format_secs(Duration::ZERO), "0.00");
    }
}
