//! Sound source resolution.
//!
//! Cues prefer the macOS system sounds and fall back to a silent embedded
//! WAV when the named file does not exist (containers, stripped installs).

use std::path::PathBuf;

/// Directories searched for system sounds, highest priority first.
const SYSTEM_SOUND_DIRS: &[&str] = &["/System/Library/Sounds", "/Library/Sounds"];

/// Audio file extensions the decoder handles.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "wav", "mp3", "m4a", "flac"];

/// Minimal valid WAV (16-bit PCM, 44.1 kHz, mono, zero samples). Keeps the
/// playback path exercised even where no system sounds exist.
pub const FALLBACK_WAV: &[u8] = &[
    0x52, 0x49, 0x46, 0x46, // "RIFF"
    0x24, 0x00, 0x00, 0x00, // riff size
    0x57, 0x41, 0x56, 0x45, // "WAVE"
    0x66, 0x6D, 0x74, 0x20, // "fmt "
    0x10, 0x00, 0x00, 0x00, // fmt chunk size
    0x01, 0x00, // PCM
    0x01, 0x00, // mono
    0x44, 0xAC, 0x00, 0x00, // 44100 Hz
    0x88, 0x58, 0x01, 0x00, // byte rate
    0x02, 0x00, // block align
    0x10, 0x00, // 16 bits per sample
    0x64, 0x61, 0x74, 0x61, // "data"
    0x00, 0x00, 0x00, 0x00, // no samples
];

/// Where a cue's audio comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sound file under the system sound directories.
    System { name: String, path: PathBuf },
    /// The silent WAV compiled into the binary.
    Embedded,
}

impl SoundSource {
    #[must_use]
    pub fn system(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::System {
            name: name.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::System { name, .. } => name,
            Self::Embedded => "embedded",
        }
    }

    #[must_use]
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded)
    }
}

/// Resolves a system sound by name, falling back to the embedded WAV.
#[must_use]
pub fn resolve(name: &str) -> SoundSource {
    for dir in SYSTEM_SOUND_DIRS {
        for ext in SUPPORTED_EXTENSIONS {
            let path = PathBuf::from(dir).join(format!("{name}.{ext}"));
            if path.is_file() {
                return SoundSource::system(name, path);
            }
        }
    }
    SoundSource::Embedded
}
