use log::{debug, info};

use crate::clock::Clock;
use crate::engine::{InvalidDurationError, Snapshot, TimerSession};
use crate::presenter::Presenter;

/// Sole owner of the active [`TimerSession`].
///
/// Commands and ticks must come from one scheduling context; the session is
/// replaced wholesale on launch and dropped on reset, so a superseded session
/// never sees another tick.
pub struct RingController<C: Clock, P: Presenter> {
    clock: C,
    presenter: P,
    session: Option<TimerSession>,
}

impl<C: Clock, P: Presenter> RingController<C, P> {
    pub fn new(clock: C, presenter: P) -> Self {
        Self {
            clock,
            presenter,
            session: None,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn session(&self) -> Option<&TimerSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.session.is_some_and(|s| s.is_paused())
    }

    /// Start a new session, discarding any current one. On error the
    /// previous session is left untouched.
    pub fn launch(&mut self, lap_duration_ms: i64) -> Result<(), InvalidDurationError> {
        let session = TimerSession::launch(lap_duration_ms, self.clock.now_ms())?;
        if self.session.replace(session).is_some() {
            debug!("superseded running session");
        }
        info!("launched ring with {} ms laps", lap_duration_ms);
        self.presenter.render(&session.last_snapshot());
        Ok(())
    }

    pub fn pause(&mut self) {
        let now = self.clock.now_ms();
        self.update(|s| s.pause(now));
    }

    pub fn resume(&mut self) {
        let now = self.clock.now_ms();
        self.update(|s| s.resume(now));
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn reset(&mut self) {
        if self.session.take().is_some() {
            info!("ring reset");
        }
        self.presenter.clear();
    }

    /// Advance the active session to the current time and report to the
    /// presenter. Returns the snapshot, or None when nothing is running.
    pub fn on_tick(&mut self) -> Option<Snapshot> {
        let session = self.session?;
        let tick = session.tick(self.clock.now_ms());
        self.session = Some(tick.session);

        if let Some(event) = tick.event {
            debug!("boundary {:?} at lap {}", event, tick.snapshot.lap_index);
            self.presenter.on_event(event);
        }
        self.presenter.render(&tick.snapshot);
        Some(tick.snapshot)
    }

    fn update(&mut self, f: impl FnOnce(TimerSession) -> TimerSession) {
        if let Some(session) = self.session {
            let updated = f(session);
            if updated.is_paused() != session.is_paused() {
                debug!("ring {}", if updated.is_paused() { "paused" } else { "resumed" });
            }
            self.session = Some(updated);
            self.presenter.render(&updated.last_snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::engine::BoundaryEvent;
    use assert_matches::assert_matches;

    #[derive(Default)]
    struct Recorder {
        rendered: Vec<Snapshot>,
        events: Vec<BoundaryEvent>,
        cleared: usize,
    }

    impl Presenter for Recorder {
        fn render(&mut self, snapshot: &Snapshot) {
            self.rendered.push(*snapshot);
        }

        fn on_event(&mut self, event: BoundaryEvent) {
            self.events.push(event);
        }

        fn clear(&mut self) {
            self.cleared += 1;
        }
    }

    fn controller() -> (ManualClock, RingController<ManualClock, Recorder>) {
        let clock = ManualClock::new(0);
        (clock.clone(), RingController::new(clock, Recorder::default()))
    }

    #[test]
    fn launch_renders_initial_snapshot() {
        let (_clock, mut ctl) = controller();
        ctl.launch(600_000).unwrap();
        let first = ctl.presenter().rendered[0];
        assert_eq!(first.lap_index, 0);
        assert_eq!(first.remaining_ms, 600_000);
        assert_eq!(first.progress_percent, 0.0);
    }

    #[test]
    fn invalid_launch_keeps_no_session() {
        let (_clock, mut ctl) = controller();
        assert_matches!(ctl.launch(0), Err(InvalidDurationError(0)));
        assert!(!ctl.is_active());
        assert!(ctl.presenter().rendered.is_empty());
    }

    #[test]
    fn tick_without_session_is_noop() {
        let (_clock, mut ctl) = controller();
        assert_eq!(ctl.on_tick(), None);
        assert!(ctl.presenter().rendered.is_empty());
    }

    #[test]
    fn lap_event_reaches_presenter() {
        let (clock, mut ctl) = controller();
        ctl.launch(1_000).unwrap();
        clock.set(500);
        ctl.on_tick();
        clock.set(1_000);
        ctl.on_tick();
        clock.set(1_050);
        ctl.on_tick();
        assert_eq!(ctl.presenter().events, vec![BoundaryEvent::LapComplete]);
    }

    #[test]
    fn toggle_pause_freezes_and_resumes() {
        let (clock, mut ctl) = controller();
        ctl.launch(10_000).unwrap();
        clock.set(2_000);
        let before = ctl.on_tick().unwrap();

        ctl.toggle_pause();
        assert!(ctl.is_paused());
        clock.set(7_000);
        let frozen = ctl.on_tick().unwrap();
        assert_eq!(frozen.remaining_ms, before.remaining_ms);
        assert!(frozen.is_paused);

        ctl.toggle_pause();
        clock.set(8_000);
        let after = ctl.on_tick().unwrap();
        assert_eq!(after.remaining_ms, 7_000);
    }

    #[test]
    fn relaunch_discards_previous_session() {
        let (clock, mut ctl) = controller();
        ctl.launch(1_000).unwrap();
        clock.set(5_500);
        ctl.launch(2_000).unwrap();
        assert_eq!(ctl.session().map(|s| s.lap_duration_ms()), Some(2_000));

        clock.set(6_000);
        let snap = ctl.on_tick().unwrap();
        assert_eq!(snap.lap_index, 0);
        assert_eq!(snap.remaining_ms, 1_500);
        assert!(ctl.presenter().events.is_empty());
    }

    #[test]
    fn reset_discards_session_and_clears_presenter() {
        let (clock, mut ctl) = controller();
        ctl.launch(1_000).unwrap();
        ctl.reset();
        assert!(!ctl.is_active());
        assert_eq!(ctl.presenter().cleared, 1);

        clock.set(5_000);
        assert_eq!(ctl.on_tick(), None);
    }
}
