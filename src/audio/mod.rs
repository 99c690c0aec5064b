// Audio module - collaborators for reference-track playback and sound previews
//
// The settings core does not own an audio engine. It drives playback and
// previews through the ReferenceTrack and SoundPlayer traits; the types here
// are the implementations used by the CLI and by tests.

pub mod sound;
pub mod track;

// Re-export commonly used types for convenience
pub use sound::{LogSoundPlayer, SoundPlayer};
pub use track::{ClockTrack, ManualTrack, ReferenceTrack};
