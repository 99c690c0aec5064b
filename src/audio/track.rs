//! Reference track - the looping metronome the player taps along to
//!
//! Two implementations:
//! - [`ClockTrack`]: position derived from a monotonic wall clock, used by the
//!   interactive CLI where the player hears their own metronome
//! - [`ManualTrack`]: position set explicitly, used by simulations and tests

use std::time::Instant;

/// Playback control and position of the calibration loop
pub trait ReferenceTrack {
    /// Current playback position in seconds (0 when stopped)
    fn position_secs(&self) -> f64;

    fn is_playing(&self) -> bool;

    /// Start playback from the beginning with looping enabled
    fn play_looping(&mut self);

    /// Stop playback and rewind
    fn stop(&mut self);
}

/// Position inside a loop of `loop_secs` after `elapsed_secs` of playback
#[inline]
pub fn looped_position(elapsed_secs: f64, loop_secs: f64) -> f64 {
    if loop_secs > 0.0 {
        elapsed_secs.rem_euclid(loop_secs)
    } else {
        elapsed_secs
    }
}

/// Wall-clock driven looping track
#[derive(Debug, Clone)]
pub struct ClockTrack {
    loop_secs: f64,
    started_at: Option<Instant>,
}

impl ClockTrack {
    /// Create a stopped track that loops every `loop_secs`
    pub fn new(loop_secs: f64) -> Self {
        Self {
            loop_secs,
            started_at: None,
        }
    }

    pub fn loop_secs(&self) -> f64 {
        self.loop_secs
    }
}

impl ReferenceTrack for ClockTrack {
    fn position_secs(&self) -> f64 {
        match self.started_at {
            Some(start) => looped_position(start.elapsed().as_secs_f64(), self.loop_secs),
            None => 0.0,
        }
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn play_looping(&mut self) {
        self.started_at = Some(Instant::now());
        log::info!("[ClockTrack] Playing, loop length {:.3}s", self.loop_secs);
    }

    fn stop(&mut self) {
        if self.started_at.take().is_some() {
            log::info!("[ClockTrack] Stopped");
        }
    }
}

/// Track whose position is set by the caller
#[derive(Debug, Clone, Default)]
pub struct ManualTrack {
    position_secs: f64,
    playing: bool,
}

impl ManualTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the playhead
    pub fn seek(&mut self, position_secs: f64) {
        self.position_secs = position_secs;
    }
}

impl ReferenceTrack for ManualTrack {
    fn position_secs(&self) -> f64 {
        self.position_secs
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play_looping(&mut self) {
        self.playing = true;
        self.position_secs = 0.0;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position_secs = 0.0;
    }
}
