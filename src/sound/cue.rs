//! Cue-to-sound mapping and the bus listener that plays cues.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::events::{AppEvent, SoundKind};

use super::source::{resolve, SoundSource};
use super::SoundPlayer;

/// Maps a cue onto its preferred system sound.
#[must_use]
pub fn source_for(kind: SoundKind) -> SoundSource {
    let name = match kind {
        SoundKind::SessionStart => "Glass",
        SoundKind::WorkComplete => "Hero",
        SoundKind::BreakComplete => "Funk",
        SoundKind::MicroBreak => "Tink",
    };
    resolve(name)
}

/// Listens for `PlaySound` events and drives the player.
///
/// Runs until the bus closes. Playback failures are logged and swallowed:
/// a broken audio stack must never take the timer down.
pub async fn run_cue_listener(
    player: Arc<dyn SoundPlayer + Send + Sync>,
    mut rx: broadcast::Receiver<AppEvent>,
) {
    loop {
        match rx.recv().await {
            Ok(AppEvent::PlaySound(kind)) => {
                let source = source_for(kind);
                debug!(cue = ?kind, sound = source.name(), "playing cue");
                if let Err(e) = player.play(&source) {
                    warn!("cue playback failed: {e}");
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "cue listener lagged behind the event bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
