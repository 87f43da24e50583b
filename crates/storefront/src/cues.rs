//! Audio feedback for cart actions.
//!
//! Cues are decorative. A sink that fails to play one is logged and
//! ignored; cart state never depends on it.

use std::io::{self, Write};
use std::time::Duration;

use thiserror::Error;

/// Failure to produce a cue.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("audio output failed: {0}")]
    Io(#[from] io::Error),
}

/// Which sound to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Item added or quantity increased: rising chime.
    Add,
    /// Row removed: falling chime.
    Remove,
}

/// Oscillator parameters for a cue: a sine sweep with a short attack and an
/// exponential fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    /// Time to sweep from `start_hz` to `end_hz`.
    pub sweep: Duration,
    pub peak_gain: f32,
    pub attack: Duration,
    pub duration: Duration,
}

const C5_HZ: f32 = 523.25;
const G5_HZ: f32 = 783.99;

impl Cue {
    /// Tone description for this cue.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Add => Tone {
                start_hz: C5_HZ,
                end_hz: G5_HZ,
                sweep: Duration::from_millis(100),
                peak_gain: 0.2,
                attack: Duration::from_millis(10),
                duration: Duration::from_millis(500),
            },
            Self::Remove => Tone {
                start_hz: G5_HZ,
                end_hz: C5_HZ,
                sweep: Duration::from_millis(100),
                peak_gain: 0.1,
                attack: Duration::from_millis(10),
                duration: Duration::from_millis(300),
            },
        }
    }
}

/// Something that can play cues.
pub trait CueSink {
    /// Play `cue`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output device is unavailable.
    fn play(&self, cue: Cue) -> Result<(), CueError>;
}

/// Sink that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCues;

impl CueSink for SilentCues {
    fn play(&self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }
}

/// Sink that rings the terminal bell on stderr for every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl CueSink for TerminalBell {
    fn play(&self, _cue: Cue) -> Result<(), CueError> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tone_rises() {
        let tone = Cue::Add.tone();
        assert!(tone.end_hz > tone.start_hz);
        assert_eq!(tone.duration, Duration::from_millis(500));
    }

    #[test]
    fn test_remove_tone_falls_and_is_quieter() {
        let add = Cue::Add.tone();
        let remove = Cue::Remove.tone();
        assert!(remove.end_hz < remove.start_hz);
        assert!(remove.peak_gain < add.peak_gain);
        assert!(remove.duration < add.duration);
    }

    #[test]
    fn test_silent_sink_never_fails() {
        assert!(SilentCues.play(Cue::Add).is_ok());
        assert!(SilentCues.play(Cue::Remove).is_ok());
    }
}
