use std::time::{Duration, Instant};

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::{BoundaryEvent, Snapshot};
use crate::feedback::{Cue, CueSink};

/// Receiving end of the controller: renders snapshots and reacts to boundaries
pub trait Presenter {
    fn render(&mut self, snapshot: &Snapshot);
    fn on_event(&mut self, event: BoundaryEvent);
    /// The session was discarded; hide the ring.
    fn clear(&mut self) {}
}

/// What is printed in the middle of the ring
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RingMode {
    /// completed laps
    #[default]
    Counter,
    /// time left in the current lap
    Countdown,
    /// bare ring
    Plain,
}

/// Format remaining milliseconds as "HH:MM:SS", rounding seconds up
pub fn format_remaining(remaining_ms: u64) -> String {
    let total_secs = remaining_ms.div_ceil(1000);
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    pub event: BoundaryEvent,
    pub until: Instant,
}

/// Presenter state read by the terminal UI
pub struct RingView {
    pub mode: RingMode,
    pub snapshot: Option<Snapshot>,
    pub flash: Option<Flash>,
    cues: Box<dyn CueSink>,
}

impl RingView {
    pub fn new(mode: RingMode, cues: Box<dyn CueSink>) -> Self {
        Self {
            mode,
            snapshot: None,
            flash: None,
            cues,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn progress_percent(&self) -> f64 {
        self.snapshot.map_or(0.0, |s| s.progress_percent)
    }

    /// Text drawn inside the ring for the current mode
    pub fn center_label(&self) -> Option<String> {
        let snapshot = self.snapshot?;
        match self.mode {
            RingMode::Counter => Some(snapshot.lap_index.to_string()),
            RingMode::Countdown => Some(format_remaining(snapshot.remaining_ms)),
            RingMode::Plain => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.snapshot.is_some_and(|s| s.is_paused)
    }

    pub fn flash_at(&self, now: Instant) -> Option<BoundaryEvent> {
        self.flash.filter(|f| now < f.until).map(|f| f.event)
    }

    /// Drop an expired flash; returns true while one is still showing.
    pub fn expire_flash(&mut self, now: Instant) -> bool {
        if self.flash_at(now).is_none() {
            self.flash = None;
        }
        self.flash.is_some()
    }

    fn start_flash(&mut self, event: BoundaryEvent, length: Duration) {
        self.flash = Some(Flash {
            event,
            until: Instant::now() + length,
        });
    }
}

impl Presenter for RingView {
    fn render(&mut self, snapshot: &Snapshot) {
        self.snapshot = Some(*snapshot);
    }

    fn on_event(&mut self, event: BoundaryEvent) {
        let cue = Cue::from(event);
        if let Err(e) = self.cues.play(&cue) {
            warn!("failed to play {:?} cue: {}", cue.sound, e);
        }
        self.start_flash(event, cue.vibration);
    }

    fn clear(&mut self) {
        self.snapshot = None;
        self.flash = None;
    }
}
