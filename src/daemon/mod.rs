//! Daemon wiring.
//!
//! Owns the long-lived pieces and connects them: the timer controller
//! behind a mutex, a 1 Hz ticker task driving it, the cue listener, a
//! session recorder that persists completed work sessions, and the IPC
//! accept loop. Everything shares the broadcast event bus; the daemon
//! shuts down on ctrl-c.

pub mod ipc;

pub use ipc::{IpcServer, RequestHandler};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, Mutex};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::engine::{Clock, SystemClock, TimerController};
use crate::events::{AppEvent, EventBus};
use crate::sound;
use crate::store::Gateway;
use crate::types::IpcResponse;

/// Directory name under the home directory for socket and settings.
const DATA_DIR_NAME: &str = ".respite";

/// Returns `~/.respite`, creating nothing.
pub fn data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Path of the daemon's Unix socket.
pub fn socket_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("respite.sock"))
}

/// Path of the settings-and-history document.
pub fn store_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("settings.json"))
}

/// Runs the daemon until ctrl-c.
pub async fn run() -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let gateway = Gateway::new(store_path()?);
    let doc = gateway.load(clock.now());
    let config = doc.config.clone();
    info!(
        work_minutes = config.work_minutes,
        break_minutes = config.break_minutes,
        sessions = doc.focus_sessions.len(),
        "settings loaded"
    );

    let bus = EventBus::new();
    let controller = Arc::new(Mutex::new(TimerController::new(
        config.clone(),
        bus.clone(),
        clock.clone(),
    )));

    // the rodio stream lives on its own thread; this handle is shareable
    let player: Arc<dyn sound::SoundPlayer + Send + Sync> =
        Arc::new(sound::ThreadedSoundPlayer::spawn());
    tokio::spawn(sound::run_cue_listener(player, bus.subscribe()));

    tokio::spawn(run_session_recorder(
        gateway.clone(),
        clock.clone(),
        bus.subscribe(),
    ));

    spawn_ticker(controller.clone());

    let server = IpcServer::bind(&socket_path()?)?;
    let handler = Arc::new(RequestHandler::new(controller, gateway, clock));
    info!(socket = %server.socket_path().display(), "daemon listening");

    loop {
        tokio::select! {
            accepted = server.accept() => {
                match accepted {
                    Ok(stream) => {
                        tokio::spawn(serve_connection(stream, handler.clone()));
                    }
                    Err(e) => warn!("failed to accept connection: {e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

/// Drives the controller at 1 Hz. Missed ticks are skipped, not bunched:
/// after a system sleep the countdown resumes instead of fast-forwarding.
fn spawn_ticker(controller: Arc<Mutex<TimerController>>) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            controller.lock().await.tick();
        }
    });
}

/// Handles one client connection: one request, one response.
async fn serve_connection(mut stream: tokio::net::UnixStream, handler: Arc<RequestHandler>) {
    match IpcServer::receive_request(&mut stream).await {
        Ok(request) => {
            let response = handler.handle(request).await;
            if let Err(e) = IpcServer::send_response(&mut stream, &response).await {
                warn!("failed to send response: {e}");
            }
        }
        Err(e) => {
            warn!("invalid request: {e}");
            let response = IpcResponse::error(e.to_string());
            let _ = IpcServer::send_response(&mut stream, &response).await;
        }
    }
}

/// Persists completed sessions published on the bus.
///
/// Failures are logged, never propagated: a full disk must not stop the
/// running timer.
async fn run_session_recorder(
    gateway: Gateway,
    clock: Arc<dyn Clock>,
    mut rx: broadcast::Receiver<AppEvent>,
) {
    loop {
        match rx.recv().await {
            Ok(AppEvent::SessionRecorded(session)) => {
                let gateway = gateway.clone();
                let now = clock.now();
                let result =
                    tokio::task::spawn_blocking(move || gateway.append_session(session, now))
                        .await;
                match result {
                    Ok(Ok(())) => info!("session recorded"),
                    Ok(Err(e)) => warn!("failed to persist session: {e}"),
                    Err(e) => warn!("session recorder task failed: {e}"),
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "session recorder lagged behind the event bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_share_directory() {
        let dir = data_dir().unwrap();
        assert!(socket_path().unwrap().starts_with(&dir));
        assert!(store_path().unwrap().starts_with(&dir));
    }

    #[tokio::test]
    async fn test_session_recorder_persists_published_sessions() {
        use crate::engine::ManualClock;
        use crate::types::FocusSession;
        use chrono::{TimeZone, Utc};

        let dir = tempfile::TempDir::new().unwrap();
        let gateway = Gateway::new(dir.path().join("settings.json"));
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(now));

        let bus = EventBus::new();
        let rx = bus.subscribe();
        let recorder = tokio::spawn(run_session_recorder(gateway.clone(), clock, rx));

        let session = FocusSession::work(now, now + chrono::Duration::minutes(25), 25);
        bus.publish(AppEvent::SessionRecorded(session));
        drop(bus);
        recorder.await.unwrap();

        let doc = gateway.load(now);
        assert_eq!(doc.focus_sessions.len(), 1);
        assert_eq!(doc.focus_sessions[0].duration_minutes, 25);
    }
}
