use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Reference cadence of the ring animation
pub const DEFAULT_TICK_MS: u64 = 50;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum RingEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The event source is gone; nothing more will arrive.
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<RingEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<RingEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(RingEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(RingEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<RingEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TICK_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<RingEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<RingEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<RingEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are only produced while armed. Deadlines are absolute, so a steady
/// stream of key events cannot starve the ring, and a late tick moves the
/// schedule forward instead of firing a burst of catch-up ticks.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Option<Instant>,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            next_tick: None,
        }
    }

    /// Arm a fresh tick schedule, replacing any previous one
    pub fn start_ticking(&mut self) {
        self.next_tick = Some(Instant::now() + self.ticker.interval());
    }

    pub fn stop_ticking(&mut self) {
        self.next_tick = None;
    }

    pub fn is_ticking(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Blocks until the next event, or returns Tick once the armed deadline passes
    pub fn step(&mut self) -> RingEvent {
        loop {
            let timeout = match self.next_tick {
                Some(due) => due.saturating_duration_since(Instant::now()),
                None => self.ticker.interval(),
            };

            if self.next_tick.is_some() && timeout.is_zero() {
                self.advance_schedule();
                return RingEvent::Tick;
            }

            match self.event_source.recv_timeout(timeout) {
                Ok(ev) => return ev,
                Err(RecvTimeoutError::Disconnected) => return RingEvent::Closed,
                Err(RecvTimeoutError::Timeout) => {
                    if self.next_tick.is_some() {
                        self.advance_schedule();
                        return RingEvent::Tick;
                    }
                }
            }
        }
    }

    fn advance_schedule(&mut self) {
        let interval = self.ticker.interval();
        let now = Instant::now();
        if let Some(due) = self.next_tick {
            let next = due + interval;
            self.next_tick = Some(if next <= now { now + interval } else { next });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout_when_armed() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);
        runner.start_ticking();

        // With no events available, step should yield Tick
        match runner.step() {
            RingEvent::Tick => {}
            other => panic!("expected Tick on timeout, got {other:?}"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(RingEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let mut runner = Runner::new(es, ticker);

        match runner.step() {
            RingEvent::Resize => {}
            other => panic!("expected Resize event, got {other:?}"),
        }
    }

    #[test]
    fn disarmed_runner_does_not_tick() {
        let (tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);
        runner.start_ticking();
        runner.stop_ticking();
        assert!(!runner.is_ticking());

        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            let _ = tx.send(RingEvent::Resize);
        });

        // Several intervals pass without a Tick before the Resize arrives
        match runner.step() {
            RingEvent::Resize => {}
            other => panic!("expected Resize, got {other:?}"),
        }
    }

    #[test]
    fn ticks_are_not_starved_by_key_stream() {
        let (tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(5));
        let mut runner = Runner::new(es, ticker);
        runner.start_ticking();

        for _ in 0..200 {
            tx.send(RingEvent::Resize).unwrap();
        }
        std::thread::sleep(Duration::from_millis(10));

        // Deadline already passed: the tick wins over queued events
        match runner.step() {
            RingEvent::Tick => {}
            other => panic!("expected Tick, got {other:?}"),
        }
    }

    #[test]
    fn closed_source_reports_closed() {
        let (tx, rx) = mpsc::channel::<RingEvent>();
        drop(tx);
        let mut runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());
        match runner.step() {
            RingEvent::Closed => {}
            other => panic!("expected Closed, got {other:?}"),
        }
    }
}
