// CalibrationTracker - running mean of tap offsets against a metronome loop
//
// One tracker exists per input device. Every tap is converted to a signed
// offset from the nearest beat of the reference loop; taps within the
// acceptance window are folded into a running mean, the rest are dropped.
//
// Invariant after every fire_input()/record_offset()/reset():
//   calibration == sum_of_offsets / max(sample_count, 1)

use crate::calibration::setup::CalibrationSetup;
use crate::error::SettingsError;
use crate::preferences::PreferenceStore;

/// Result of feeding one tap to a tracker
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SampleOutcome {
    /// Tap folded into the running mean
    Accepted { offset_secs: f64 },
    /// Tap too far from any beat; tracker unchanged
    Rejected { offset_secs: f64 },
}

impl SampleOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SampleOutcome::Accepted { .. })
    }

    /// Offset computed for the tap, whether or not it was kept
    pub fn offset_secs(&self) -> f64 {
        match self {
            SampleOutcome::Accepted { offset_secs } | SampleOutcome::Rejected { offset_secs } => {
                *offset_secs
            }
        }
    }
}

/// Measures and averages the latency of one input device
#[derive(Debug, Clone)]
pub struct CalibrationTracker {
    /// Preference key used by load()/persist()
    key: String,
    setup: CalibrationSetup,
    /// Current best estimate in seconds
    calibration: f64,
    sum_of_offsets: f64,
    sample_count: u32,
}

impl CalibrationTracker {
    /// Create an empty tracker (calibration 0)
    pub fn new(key: impl Into<String>, setup: CalibrationSetup) -> Self {
        Self::with_calibration(key, setup, 0.0)
    }

    /// Create a tracker seeded with a previously measured calibration
    ///
    /// No samples are attached to the seed, so the first accepted tap of the
    /// session replaces it.
    pub fn with_calibration(key: impl Into<String>, setup: CalibrationSetup, calibration: f64) -> Self {
        Self {
            key: key.into(),
            setup,
            calibration,
            sum_of_offsets: 0.0,
            sample_count: 0,
        }
    }

    /// Create a tracker seeded from `store` (0 when the key is missing)
    pub fn load<S: PreferenceStore + ?Sized>(
        key: impl Into<String>,
        setup: CalibrationSetup,
        store: &S,
    ) -> Self {
        let key = key.into();
        let calibration = store.get_float(&key, 0.0);
        log::info!("[Calibration] Loaded {} = {:.5}", key, calibration);
        Self::with_calibration(key, setup, calibration)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn setup(&self) -> &CalibrationSetup {
        &self.setup
    }

    pub fn calibration(&self) -> f64 {
        self.calibration
    }

    pub fn sum_of_offsets(&self) -> f64 {
        self.sum_of_offsets
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Feed a tap taken at `position_secs` of the reference track
    ///
    /// The caller is responsible for only calling this while the track plays.
    pub fn fire_input(&mut self, position_secs: f64) -> SampleOutcome {
        let offset_secs = self.setup.offset_from_nearest_beat(position_secs);
        let outcome = self.record_offset(offset_secs);

        tracing::debug!(
            key = %self.key,
            position_secs,
            offset_secs,
            accepted = outcome.is_accepted(),
            calibration = self.calibration,
            "calibration tap"
        );

        outcome
    }

    /// Apply the acceptance gate to an already computed offset
    ///
    /// `|offset| <= 2 * max_offset_secs` is accepted (inclusive). NaN offsets
    /// never pass the gate.
    pub fn record_offset(&mut self, offset_secs: f64) -> SampleOutcome {
        if offset_secs.abs() <= self.setup.acceptance_window_secs() {
            self.sample_count += 1;
            self.sum_of_offsets += offset_secs;
            self.compute();
            SampleOutcome::Accepted { offset_secs }
        } else {
            SampleOutcome::Rejected { offset_secs }
        }
    }

    /// Discard every sample and zero the calibration
    pub fn reset(&mut self) {
        self.sum_of_offsets = 0.0;
        self.sample_count = 0;
        self.calibration = 0.0;
    }

    /// Write the calibration under this tracker's key and flush immediately
    ///
    /// # Errors
    /// Whatever the store's flush reports; nothing is masked here.
    pub fn persist<S: PreferenceStore + ?Sized>(&self, store: &mut S) -> Result<(), SettingsError> {
        store.put_float(&self.key, self.calibration);
        store.flush()?;
        log::info!("[Calibration] Persisted {} = {:.5}", self.key, self.calibration);
        Ok(())
    }

    fn compute(&mut self) {
        self.calibration = self.sum_of_offsets / f64::from(self.sample_count.max(1));
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
