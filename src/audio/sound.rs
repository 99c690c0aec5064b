// Sound previews for the sound-effect toggles

/// Fire-and-forget sound effect playback
pub trait SoundPlayer {
    /// Play the sound registered as `sound_id` at `volume` (0.0-1.0)
    fn play(&mut self, sound_id: &str, volume: f32);
}

/// Sound player that only logs what it would play
///
/// Used headless, where there is no audio device to preview on.
#[derive(Debug, Clone, Default)]
pub struct LogSoundPlayer {
    played: Vec<(String, f32)>,
}

impl LogSoundPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every (sound_id, volume) requested so far
    pub fn played(&self) -> &[(String, f32)] {
        &self.played
    }
}

impl SoundPlayer for LogSoundPlayer {
    fn play(&mut self, sound_id: &str, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        tracing::info!(sound_id, volume, "sound preview");
        self.played.push((sound_id.to_string(), volume));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_player_records_and_clamps() {
        let mut player = LogSoundPlayer::new();
        player.play("playalong_sfx_monster_ace", 1.0);
        player.play("playalong_sfx_perfect_fail", 3.0);

        assert_eq!(player.played().len(), 2);
        assert_eq!(player.played()[0], ("playalong_sfx_monster_ace".to_string(), 1.0));
        assert_eq!(player.played()[1].1, 1.0);
    }
}
