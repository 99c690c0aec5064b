//! Tempo - beat/second conversions
//!
//! Pure linear scalings between wall-clock seconds and musical beats at a
//! fixed tempo. No state, no allocations.

/// Converts a duration in seconds to beats at the given tempo.
///
/// Formula: beats = seconds × BPM / 60
///
/// # Examples
/// ```
/// use playalong_settings::tempo::seconds_to_beats;
/// assert!((seconds_to_beats(0.48, 125.0) - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn seconds_to_beats(seconds: f64, bpm: f64) -> f64 {
    seconds * bpm / 60.0
}

/// Converts a number of beats to seconds at the given tempo.
///
/// Formula: seconds = beats × 60 / BPM
///
/// # Examples
/// ```
/// use playalong_settings::tempo::beats_to_seconds;
/// assert!((beats_to_seconds(32.0, 125.0) - 15.36).abs() < 1e-12);
/// ```
#[inline]
pub fn beats_to_seconds(beats: f64, bpm: f64) -> f64 {
    beats * 60.0 / bpm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_beats_formula() {
        // At 120 BPM a beat lasts 0.5s
        assert!((seconds_to_beats(1.0, 120.0) - 2.0).abs() < 1e-12);
        // At 60 BPM one beat per second
        assert!((seconds_to_beats(3.0, 60.0) - 3.0).abs() < 1e-12);
        // At 125 BPM a beat lasts 0.48s
        assert!((seconds_to_beats(0.96, 125.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_beats_to_seconds_formula() {
        assert!((beats_to_seconds(2.0, 120.0) - 1.0).abs() < 1e-12);
        assert!((beats_to_seconds(1.0, 125.0) - 0.48).abs() < 1e-12);
        assert!((beats_to_seconds(0.4, 125.0) - 0.192).abs() < 1e-12);
    }

    #[test]
    fn test_conversions_are_inverse() {
        for &bpm in &[60.0, 100.0, 125.0, 174.0] {
            for &secs in &[-0.126, 0.0, 0.3, 1.5, 15.36, 42.0] {
                let back = beats_to_seconds(seconds_to_beats(secs, bpm), bpm);
                assert!(
                    (back - secs).abs() < 1e-9,
                    "{} s at {} BPM came back as {}",
                    secs,
                    bpm,
                    back
                );
            }
        }
    }

    #[test]
    fn test_negative_values_scale_linearly() {
        assert!((seconds_to_beats(-0.48, 125.0) + 1.0).abs() < 1e-12);
        assert!((beats_to_seconds(-0.5, 125.0) + 0.24).abs() < 1e-12);
    }
}
