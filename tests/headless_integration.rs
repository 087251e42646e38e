use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lapring::{
    clock::ManualClock,
    engine::{BoundaryEvent, Snapshot, HOUR_RESET_MS},
    feedback::{Cue, CueSink, RecordingSink, Sound},
    presenter::Presenter,
    runtime::{FixedTicker, RingEvent, Runner, TestEventSource},
    RingController,
};

// Presenter that keeps everything it is told, for assertions
#[derive(Default)]
struct Log {
    snapshots: Vec<Snapshot>,
    cues: RecordingSink,
}

impl Presenter for Log {
    fn render(&mut self, snapshot: &Snapshot) {
        self.snapshots.push(*snapshot);
    }

    fn on_event(&mut self, event: BoundaryEvent) {
        self.cues.play(&Cue::from(event)).unwrap();
    }

    fn clear(&mut self) {
        self.snapshots.clear();
    }
}

// Headless integration using the internal runtime + controller without a TTY.
// The manual clock moves a second per tick, so a 3 s lap completes every 3 ticks.
#[test]
fn headless_ring_counts_laps() {
    let clock = ManualClock::new(0);
    let mut ring = RingController::new(clock.clone(), Log::default());
    ring.launch(3_000).unwrap();

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(1));
    let mut runner = Runner::new(es, ticker);
    runner.start_ticking();

    let mut ticks = 0u32;
    for _ in 0..200u32 {
        match runner.step() {
            RingEvent::Tick => {
                clock.advance(1_000);
                ring.on_tick();
                ticks += 1;
                if ticks == 9 {
                    runner.stop_ticking();
                    tx.send(RingEvent::Key(KeyEvent::new(
                        KeyCode::Esc,
                        KeyModifiers::NONE,
                    )))
                    .unwrap();
                }
            }
            RingEvent::Key(_) | RingEvent::Closed => break,
            RingEvent::Resize => {}
        }
    }

    assert_eq!(ticks, 9);
    let last = *ring.presenter().snapshots.last().unwrap();
    assert_eq!(last.lap_index, 3);
    assert_eq!(last.remaining_ms, 3_000);
    let sounds: Vec<Sound> = ring.presenter().cues.played.iter().map(|c| c.sound).collect();
    assert_eq!(sounds, vec![Sound::Lap; 3]);
}

#[test]
fn headless_pause_holds_the_ring() {
    let clock = ManualClock::new(0);
    let mut ring = RingController::new(clock.clone(), Log::default());
    ring.launch(600_000).unwrap();

    clock.set(600_000);
    let at_lap = ring.on_tick().unwrap();
    ring.pause();

    clock.set(700_000);
    let p1 = ring.on_tick().unwrap();
    clock.set(800_000);
    let p2 = ring.on_tick().unwrap();
    assert_eq!(p1, p2);
    assert_eq!(p1.remaining_ms, at_lap.remaining_ms);
    assert_eq!(p1.lap_index, at_lap.lap_index);

    clock.set(900_000);
    ring.resume();
    clock.set(1_000_000);
    let after = ring.on_tick().unwrap();
    assert_eq!(after.lap_index, 1);
    assert_eq!(after.remaining_ms, 600_000 - 100_000);
}

#[test]
fn headless_hour_reset_plays_long_cue() {
    let clock = ManualClock::new(0);
    let mut ring = RingController::new(clock.clone(), Log::default());
    ring.launch(25 * 60 * 1000).unwrap();

    for minute in 1..=61u64 {
        clock.set(minute * 60 * 1000);
        ring.on_tick();
    }

    let sounds: Vec<Sound> = ring.presenter().cues.played.iter().map(|c| c.sound).collect();
    // laps at 25 and 50 minutes, then the hourly reset at 60
    assert_eq!(sounds, vec![Sound::Lap, Sound::Lap, Sound::Long]);
    let last = *ring.presenter().snapshots.last().unwrap();
    assert_eq!(last.hour_resets, 1);
    assert_eq!(last.lap_index, 0);
    assert_eq!(
        ring.session().unwrap().elapsed_ms(61 * 60 * 1000),
        61 * 60 * 1000 - HOUR_RESET_MS
    );
}
