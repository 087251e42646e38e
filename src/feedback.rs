use std::io::{self, Write};
use std::time::Duration;

use crate::engine::BoundaryEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// short chime at the end of every lap
    Lap,
    /// distinct, longer signal at the hourly reset
    Long,
}

/// Audio + haptic feedback for one boundary event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub sound: Sound,
    pub vibration: Duration,
}

impl From<BoundaryEvent> for Cue {
    fn from(event: BoundaryEvent) -> Self {
        match event {
            BoundaryEvent::LapComplete => Cue {
                sound: Sound::Lap,
                vibration: Duration::from_millis(500),
            },
            BoundaryEvent::HourReset => Cue {
                sound: Sound::Long,
                vibration: Duration::from_millis(2000),
            },
        }
    }
}

pub trait CueSink {
    fn play(&mut self, cue: &Cue) -> io::Result<()>;
}

/// Rings the terminal bell: once for a lap, three times for the hourly reset
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CueSink for TerminalBell<W> {
    fn play(&mut self, cue: &Cue) -> io::Result<()> {
        let bells: &[u8] = match cue.sound {
            Sound::Lap => b"\x07",
            Sound::Long => b"\x07\x07\x07",
        };
        self.out.write_all(bells)?;
        self.out.flush()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl CueSink for Muted {
    fn play(&mut self, _cue: &Cue) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every cue it is asked to play
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub played: Vec<Cue>,
}

impl CueSink for RecordingSink {
    fn play(&mut self, cue: &Cue) -> io::Result<()> {
        self.played.push(*cue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_follow_event_kind() {
        let lap = Cue::from(BoundaryEvent::LapComplete);
        assert_eq!(lap.sound, Sound::Lap);
        assert_eq!(lap.vibration, Duration::from_millis(500));

        let long = Cue::from(BoundaryEvent::HourReset);
        assert_eq!(long.sound, Sound::Long);
        assert_eq!(long.vibration, Duration::from_secs(2));
    }

    #[test]
    fn terminal_bell_writes_bel_bytes() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play(&Cue::from(BoundaryEvent::LapComplete)).unwrap();
        bell.play(&Cue::from(BoundaryEvent::HourReset)).unwrap();
        assert_eq!(bell.out, b"\x07\x07\x07\x07".to_vec());
    }
}
