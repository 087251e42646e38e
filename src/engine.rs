//! Lap/progress/reset state machine.
//!
//! A [`TimerSession`] is a plain value threaded through [`TimerSession::pause`],
//! [`TimerSession::resume`] and [`TimerSession::tick`]. Every derived number is
//! recomputed from absolute wall-clock timestamps, so a late tick corrects
//! itself instead of compounding drift.

use thiserror::Error;

/// Elapsed running time after which lap counting restarts from zero.
pub const HOUR_RESET_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lap duration must be a positive number of milliseconds, got {0}")]
pub struct InvalidDurationError(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryEvent {
    LapComplete,
    HourReset,
}

/// Render-ready output of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub progress_percent: f64,
    pub lap_index: u64,
    /// Time left in the current lap, always in `(0, lap]`. An exact lap
    /// boundary reads as a full lap, never as zero.
    pub remaining_ms: u64,
    pub hour_resets: u64,
    pub is_paused: bool,
}

impl Snapshot {
    fn at_lap_start(lap_duration_ms: u64, hour_resets: u64) -> Self {
        Self {
            progress_percent: 0.0,
            lap_index: 0,
            remaining_ms: lap_duration_ms,
            hour_resets,
            is_paused: false,
        }
    }
}

/// Result of [`TimerSession::tick`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub session: TimerSession,
    pub snapshot: Snapshot,
    pub event: Option<BoundaryEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerSession {
    lap_duration_ms: u64,
    started_at_ms: u64,
    paused_at_ms: Option<u64>,
    accumulated_pause_ms: u64,
    last_lap_index: u64,
    // Relative to `started_at_ms`; a rebase brings it back to zero.
    last_reset_index: u64,
    hour_resets: u64,
    last_snapshot: Snapshot,
}

impl TimerSession {
    /// Start a fresh session at `now_ms`.
    pub fn launch(lap_duration_ms: i64, now_ms: u64) -> Result<Self, InvalidDurationError> {
        if lap_duration_ms <= 0 {
            return Err(InvalidDurationError(lap_duration_ms));
        }
        let lap_duration_ms = lap_duration_ms as u64;

        Ok(Self {
            lap_duration_ms,
            started_at_ms: now_ms,
            paused_at_ms: None,
            accumulated_pause_ms: 0,
            last_lap_index: 0,
            last_reset_index: 0,
            hour_resets: 0,
            last_snapshot: Snapshot::at_lap_start(lap_duration_ms, 0),
        })
    }

    pub fn lap_duration_ms(&self) -> u64 {
        self.lap_duration_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at_ms.is_some()
    }

    pub fn accumulated_pause_ms(&self) -> u64 {
        self.accumulated_pause_ms
    }

    /// Snapshot produced by the latest tick (or the launch state)
    pub fn last_snapshot(&self) -> Snapshot {
        Snapshot {
            is_paused: self.is_paused(),
            ..self.last_snapshot
        }
    }

    /// Running time at `now_ms`, frozen while paused.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        // A pause freezes the clock at the instant it began.
        let until = self.paused_at_ms.unwrap_or(now_ms);
        until
            .saturating_sub(self.started_at_ms)
            .saturating_sub(self.accumulated_pause_ms)
    }

    #[must_use]
    pub fn pause(self, now_ms: u64) -> Self {
        if self.is_paused() {
            return self;
        }
        Self {
            paused_at_ms: Some(now_ms),
            ..self
        }
    }

    #[must_use]
    pub fn resume(self, now_ms: u64) -> Self {
        match self.paused_at_ms {
            None => self,
            Some(paused_at) => Self {
                paused_at_ms: None,
                accumulated_pause_ms: self.accumulated_pause_ms + now_ms.saturating_sub(paused_at),
                ..self
            },
        }
    }

    /// Derive lap, progress and remaining time at `now_ms`.
    ///
    /// Hour-reset detection runs first and suppresses lap detection in the
    /// same tick, so at most one [`BoundaryEvent`] is reported. A tick that
    /// skips over several lap boundaries still reports a single crossing.
    #[must_use]
    pub fn tick(self, now_ms: u64) -> Tick {
        if self.is_paused() {
            return Tick {
                session: self,
                snapshot: self.last_snapshot(),
                event: None,
            };
        }

        let elapsed = self.elapsed_ms(now_ms);
        let reset_index = elapsed / HOUR_RESET_MS;

        if reset_index != self.last_reset_index {
            let hour_resets = self.hour_resets + 1;
            let snapshot = Snapshot::at_lap_start(self.lap_duration_ms, hour_resets);
            let session = Self {
                started_at_ms: now_ms,
                accumulated_pause_ms: 0,
                last_lap_index: 0,
                last_reset_index: 0,
                hour_resets,
                last_snapshot: snapshot,
                ..self
            };
            return Tick {
                session,
                snapshot,
                event: Some(BoundaryEvent::HourReset),
            };
        }

        let lap = self.lap_duration_ms;
        let lap_index = elapsed / lap;
        let into_lap = elapsed % lap;
        let event = (lap_index != self.last_lap_index).then_some(BoundaryEvent::LapComplete);

        let snapshot = Snapshot {
            progress_percent: into_lap as f64 * 100.0 / lap as f64,
            lap_index,
            remaining_ms: lap - into_lap,
            hour_resets: self.hour_resets,
            is_paused: false,
        };

        Tick {
            session: Self {
                last_lap_index: lap_index,
                last_snapshot: snapshot,
                ..self
            },
            snapshot,
            event,
        }
    }
}
