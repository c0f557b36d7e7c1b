//! Integration tests for daemon-CLI IPC communication.
//!
//! Spins up the real IPC server and request handler in a background task
//! and drives it through the real client.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tokio::sync::Mutex;

use respite::cli::client::IpcClient;
use respite::daemon::ipc::{IpcServer, RequestHandler};
use respite::engine::{Clock, ManualClock, TimerController};
use respite::types::{ConfigParams, StartParams};
use respite::{AppConfig, EventBus, Gateway};

// ============================================================================
// Test Helpers
// ============================================================================

fn temp_socket_path() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ipc_test.sock");
    // keep the directory alive for the duration of the process
    std::mem::forget(dir);
    path
}

struct Fixture {
    client: IpcClient,
    controller: Arc<Mutex<TimerController>>,
    gateway: Gateway,
    _dir: tempfile::TempDir,
}

/// Binds a server, serves `requests` connections in the background and
/// returns a connected client plus handles to the shared state.
fn fixture(requests: usize) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Gateway::new(dir.path().join("settings.json"));
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
    ));
    let controller = Arc::new(Mutex::new(TimerController::new(
        AppConfig::default(),
        EventBus::new(),
        clock.clone(),
    )));

    let socket_path = temp_socket_path();
    let server = IpcServer::bind(&socket_path).unwrap();
    let handler = RequestHandler::new(controller.clone(), gateway.clone(), clock);

    tokio::spawn(async move {
        for _ in 0..requests {
            let Ok(mut stream) = server.accept().await else {
                break;
            };
            if let Ok(request) = IpcServer::receive_request(&mut stream).await {
                let response = handler.handle(request).await;
                let _ = IpcServer::send_response(&mut stream, &response).await;
            }
        }
    });

    Fixture {
        client: IpcClient::with_socket_path(socket_path),
        controller,
        gateway,
        _dir: dir,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn start_via_ipc_begins_countdown() {
    let f = fixture(1);

    let response = f.client.start(StartParams::default()).await.unwrap();

    assert_eq!(response.status, "success");
    let data = response.data.unwrap();
    assert_eq!(data.is_running, Some(true));
    assert_eq!(data.mode.as_deref(), Some("work"));
    assert!(f.controller.lock().await.state().is_running);
}

#[tokio::test]
async fn start_with_durations_updates_settings() {
    let f = fixture(1);

    let response = f
        .client
        .start(StartParams {
            work_minutes: Some(90),
            break_minutes: Some(20),
        })
        .await
        .unwrap();

    assert_eq!(response.data.unwrap().remaining_seconds, Some(90 * 60));
    let stored = f
        .gateway
        .load(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
    assert_eq!(stored.config.work_minutes, 90);
    assert_eq!(stored.config.break_minutes, 20);
}

#[tokio::test]
async fn status_round_trip() {
    let f = fixture(2);

    f.client.start(StartParams::default()).await.unwrap();
    let response = f.client.status().await.unwrap();

    let data = response.data.unwrap();
    assert_eq!(data.is_running, Some(true));
    assert_eq!(data.remaining_seconds, Some(25 * 60));
}

#[tokio::test]
async fn stop_and_reset_round_trip() {
    let f = fixture(3);

    f.client.start(StartParams::default()).await.unwrap();
    let stopped = f.client.stop().await.unwrap();
    assert_eq!(stopped.data.unwrap().is_running, Some(false));

    let reset = f.client.reset().await.unwrap();
    let data = reset.data.unwrap();
    assert_eq!(data.mode.as_deref(), Some("work"));
    assert_eq!(data.remaining_seconds, Some(25 * 60));
}

#[tokio::test]
async fn stats_round_trip() {
    let f = fixture(1);

    let response = f.client.stats(14).await.unwrap();

    let summary = response.data.unwrap().stats.unwrap();
    assert_eq!(summary.days.len(), 14);
    assert_eq!(summary.total_sessions, 0);
}

#[tokio::test]
async fn config_update_round_trip() {
    let f = fixture(2);

    let response = f
        .client
        .config(ConfigParams {
            work_minutes: Some(50),
            prompts_enabled: Some(false),
            ..ConfigParams::default()
        })
        .await
        .unwrap();
    assert_eq!(response.status, "success");

    // the follow-up query reflects the update
    let shown = f.client.config(ConfigParams::default()).await.unwrap();
    assert!(shown.message.contains("work: 50m"));
    assert!(shown.message.contains("prompts: off"));
}

#[tokio::test]
async fn interval_bounds_stay_ordered_across_updates() {
    let f = fixture(2);

    f.client
        .config(ConfigParams {
            prompt_min_minutes: Some(45),
            ..ConfigParams::default()
        })
        .await
        .unwrap();
    f.client
        .config(ConfigParams {
            prompt_max_minutes: Some(10),
            ..ConfigParams::default()
        })
        .await
        .unwrap();

    let stored = f
        .gateway
        .load(Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
    let prompt = &stored.config.prompt;
    assert!(prompt.min_interval_minutes <= prompt.max_interval_minutes);
}

#[tokio::test]
async fn connection_error_without_daemon() {
    let client = IpcClient::with_socket_path(temp_socket_path());

    let result = client.status().await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("daemon"));
}
