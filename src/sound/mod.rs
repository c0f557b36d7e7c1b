//! Audio cues.
//!
//! The controller publishes `PlaySound` events; the cue listener here maps
//! them to macOS system sounds and plays them through rodio, falling back
//! to an embedded WAV where the named sound does not exist. The rodio
//! output stream is not `Send`, so it lives on a dedicated playback
//! thread behind [`ThreadedSoundPlayer`]. Playback is non-blocking and
//! degrades gracefully when no audio device is present.

mod cue;
mod error;
mod player;
mod source;

pub use cue::{run_cue_listener, source_for};
pub use error::SoundError;
pub use player::{RodioSoundPlayer, ThreadedSoundPlayer};
pub use source::{resolve, SoundSource, FALLBACK_WAV};

/// Playback abstraction so the daemon wiring can swap in a mock.
pub trait SoundPlayer {
    /// Plays a source without blocking.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// True when playback is muted.
    fn is_disabled(&self) -> bool;

    /// Mutes or unmutes playback.
    fn set_disabled(&self, disabled: bool);
}

/// Records played sources instead of producing audio.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    played: std::sync::Mutex<Vec<SoundSource>>,
    disabled: std::sync::atomic::AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }

    #[must_use]
    pub fn played(&self) -> Vec<SoundSource> {
        self.played.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.is_disabled() {
            return Ok(());
        }
        self.played.lock().unwrap().push(source.clone());
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled
            .store(disabled, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_plays() {
        let mock = MockSoundPlayer::new();
        mock.play(&SoundSource::Embedded).unwrap();
        mock.play(&SoundSource::Embedded).unwrap();
        assert_eq!(mock.play_count(), 2);
    }

    #[test]
    fn test_mock_respects_disabled() {
        let mock = MockSoundPlayer::new();
        mock.set_disabled(true);
        mock.play(&SoundSource::Embedded).unwrap();
        assert_eq!(mock.play_count(), 0);
    }
}
