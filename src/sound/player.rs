//! Rodio-backed playback.
//!
//! rodio's `OutputStream` wraps a cpal stream that is neither `Send` nor
//! `Sync`, so [`RodioSoundPlayer`] must stay on the thread that created
//! it. [`ThreadedSoundPlayer`] is the shareable handle: it owns a
//! dedicated playback thread holding the stream and feeds it sources over
//! a channel.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{SoundSource, FALLBACK_WAV};
use super::SoundPlayer;

/// Plays sound sources through the default audio output.
///
/// Playback is non-blocking: each cue plays on a detached sink and keeps
/// going after `play` returns. Not thread-safe; the owning thread must
/// keep it alive for as long as cues should play.
pub struct RodioSoundPlayer {
    // the stream must outlive every sink created from its handle
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Opens the default audio output.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
        debug!("audio output stream initialized");
        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays a source in the background. A failed system sound falls back
    /// to the embedded WAV.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::System { name, path } => match self.play_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.is_recoverable() => {
                    warn!("failed to play system sound '{name}': {e}, using fallback");
                    self.play_embedded()
                }
                Err(e) => Err(e),
            },
            SoundSource::Embedded => self.play_embedded(),
        }
    }

    fn play_file(&self, path: &std::path::Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {e}", path.display())))?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::Decode(e.to_string()))?;
        self.play_decoder(decoder)
    }

    fn play_embedded(&self) -> Result<(), SoundError> {
        let decoder = Decoder::new(Cursor::new(FALLBACK_WAV))
            .map_err(|e| SoundError::Decode(format!("embedded sound: {e}")))?;
        self.play_decoder(decoder)
    }

    fn play_decoder<R>(&self, decoder: Decoder<R>) -> Result<(), SoundError>
    where
        R: std::io::Read + std::io::Seek + Send + Sync + 'static,
    {
        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| SoundError::Stream(e.to_string()))?;
        sink.append(decoder);
        sink.detach();
        Ok(())
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

// ============================================================================
// ThreadedSoundPlayer
// ============================================================================

/// Shareable handle to a dedicated playback thread.
///
/// The thread opens the audio output once and owns it for its lifetime;
/// where no device exists it logs a warning and swallows cues, so the
/// daemon runs silent instead of failing. Dropping the last handle closes
/// the channel and ends the thread.
pub struct ThreadedSoundPlayer {
    tx: mpsc::Sender<SoundSource>,
    disabled: AtomicBool,
}

impl ThreadedSoundPlayer {
    /// Spawns the playback thread and returns its handle.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<SoundSource>();
        std::thread::Builder::new()
            .name("sound-playback".into())
            .spawn(move || playback_loop(&rx))
            .expect("failed to spawn playback thread");
        Self {
            tx,
            disabled: AtomicBool::new(false),
        }
    }
}

fn playback_loop(rx: &mpsc::Receiver<SoundSource>) {
    let player = match RodioSoundPlayer::new() {
        Ok(player) => player,
        Err(e) => {
            warn!("audio unavailable, running without sound: {e}");
            // keep draining so senders never block or error
            for _ in rx.iter() {}
            return;
        }
    };
    for source in rx.iter() {
        if let Err(e) = player.play(&source) {
            warn!("cue playback failed: {e}");
        }
    }
}

impl SoundPlayer for ThreadedSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.is_disabled() {
            return Ok(());
        }
        self.tx
            .send(source.clone())
            .map_err(|_| SoundError::Stream("playback thread stopped".to_string()))
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Relaxed);
        debug!(disabled, "sound playback toggled");
    }
}

impl std::fmt::Debug for ThreadedSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadedSoundPlayer")
            .field("disabled", &self.is_disabled())
            .finish_non_exhaustive()
    }
}
