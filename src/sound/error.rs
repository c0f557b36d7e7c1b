use thiserror::Error;

/// Audio playback errors.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No audio output device could be opened.
    #[error("audio device unavailable: {0}")]
    DeviceNotAvailable(String),

    /// The sound file does not exist or could not be opened.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// The audio data could not be decoded.
    #[error("failed to decode sound: {0}")]
    Decode(String),

    /// The output sink could not be created.
    #[error("failed to open audio stream: {0}")]
    Stream(String),
}

impl SoundError {
    /// True when the embedded fallback sound is worth trying.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));

        let err = SoundError::FileNotFound("/x/y.aiff".to_string());
        assert!(err.to_string().contains("/x/y.aiff"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(SoundError::FileNotFound("x".into()).is_recoverable());
        assert!(SoundError::Decode("x".into()).is_recoverable());
        assert!(!SoundError::DeviceNotAvailable("x".into()).is_recoverable());
        assert!(!SoundError::Stream("x".into()).is_recoverable());
    }
}
