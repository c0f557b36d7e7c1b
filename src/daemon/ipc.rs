//! Unix domain socket IPC.
//!
//! One request and one response per connection, both single JSON
//! documents. The server owns the socket file and removes it on drop; the
//! request handler translates commands into controller and store calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::engine::{Clock, TimerController};
use crate::stats;
use crate::store::Gateway;
use crate::types::{ConfigParams, IpcRequest, IpcResponse, ResponseData, StartParams};

// ============================================================================
// Constants
// ============================================================================

/// Maximum request size in bytes
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

/// Default day window for the stats command
const DEFAULT_STATS_DAYS: u32 = 7;

// ============================================================================
// IpcError
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("failed to read request: {0}")]
    Read(String),

    #[error("operation timed out")]
    Timeout,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix domain socket listener with socket-file lifecycle management.
pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl IpcServer {
    /// Binds the socket, replacing a stale socket file from a previous run.
    pub fn bind(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("failed to remove stale socket: {socket_path:?}"))?;
        }
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create socket directory: {parent:?}"))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("failed to bind socket: {socket_path:?}"))?;
        debug!(path = %socket_path.display(), "IPC socket bound");

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Waits for the next client connection.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("failed to accept connection")?;
        Ok(stream)
    }

    /// Reads and decodes one request, bounded in size and time.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let n = match timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await
        {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::Read(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("connection closed by client");
        }

        let request: IpcRequest =
            serde_json::from_slice(&buffer[..n]).context("failed to decode IPC request")?;
        Ok(request)
    }

    /// Encodes and writes one response.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("failed to encode IPC response")?;
        stream
            .write_all(&json)
            .await
            .context("failed to write response")?;
        stream.flush().await.context("failed to flush response")?;
        Ok(())
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Dispatches decoded requests to the controller and the store.
pub struct RequestHandler {
    controller: Arc<Mutex<TimerController>>,
    gateway: Gateway,
    clock: Arc<dyn Clock>,
}

impl RequestHandler {
    pub fn new(
        controller: Arc<Mutex<TimerController>>,
        gateway: Gateway,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            controller,
            gateway,
            clock,
        }
    }

    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Start { params } => self.handle_start(params).await,
            IpcRequest::Stop => self.handle_stop().await,
            IpcRequest::Reset => self.handle_reset().await,
            IpcRequest::Status => self.handle_status().await,
            IpcRequest::Stats { days } => self.handle_stats(days).await,
            IpcRequest::Config { params } => self.handle_config(params).await,
        }
    }

    async fn handle_start(&self, params: StartParams) -> IpcResponse {
        let mut controller = self.controller.lock().await;

        if params.work_minutes.is_some() || params.break_minutes.is_some() {
            let mut config = controller.config().clone();
            if let Some(work) = params.work_minutes {
                config.set_work_minutes(work);
            }
            if let Some(brk) = params.break_minutes {
                config.set_break_minutes(brk);
            }
            if let Err(e) = self.gateway.save_config(&config) {
                return IpcResponse::error(format!("failed to save settings: {e}"));
            }
            controller.update_config(config);
        }

        let was_running = controller.state().is_running;
        controller.start();
        let message = if was_running {
            "Timer is already running"
        } else {
            "Timer started"
        };
        IpcResponse::success(message, Some(ResponseData::from_timer_state(controller.state())))
    }

    async fn handle_stop(&self) -> IpcResponse {
        let mut controller = self.controller.lock().await;
        controller.stop();
        IpcResponse::success(
            "Timer stopped",
            Some(ResponseData::from_timer_state(controller.state())),
        )
    }

    async fn handle_reset(&self) -> IpcResponse {
        let mut controller = self.controller.lock().await;
        controller.reset();
        IpcResponse::success(
            "Timer reset",
            Some(ResponseData::from_timer_state(controller.state())),
        )
    }

    async fn handle_status(&self) -> IpcResponse {
        let controller = self.controller.lock().await;
        IpcResponse::success("", Some(ResponseData::from_timer_state(controller.state())))
    }

    async fn handle_stats(&self, days: Option<u32>) -> IpcResponse {
        let now = self.clock.now();
        let gateway = self.gateway.clone();
        let doc = match tokio::task::spawn_blocking(move || gateway.load(now)).await {
            Ok(doc) => doc,
            Err(e) => return IpcResponse::error(format!("failed to load history: {e}")),
        };

        let summary = stats::summarize(
            &doc.focus_sessions,
            now,
            days.unwrap_or(DEFAULT_STATS_DAYS),
        );
        let data = ResponseData {
            stats: Some(summary),
            ..ResponseData::default()
        };
        IpcResponse::success("", Some(data))
    }

    async fn handle_config(&self, params: ConfigParams) -> IpcResponse {
        let mut controller = self.controller.lock().await;

        if params.is_empty() {
            return IpcResponse::success(describe_config(controller.config()), None);
        }

        let mut config = controller.config().clone();
        config.apply(&params);
        if let Err(e) = self.gateway.save_config(&config) {
            return IpcResponse::error(format!("failed to save settings: {e}"));
        }
        controller.update_config(config);
        IpcResponse::success("Settings updated", None)
    }
}

fn describe_config(config: &crate::config::AppConfig) -> String {
    format!(
        "work: {}m, break: {}m, prompts: {} ({}-{}m, {}s), sound: {}, blackout: {}",
        config.work_minutes,
        config.break_minutes,
        if config.prompt.enabled { "on" } else { "off" },
        config.prompt.min_interval_minutes,
        config.prompt.max_interval_minutes,
        config.prompt.micro_break_seconds,
        if config.sound_enabled { "on" } else { "off" },
        if config.blackout_enabled { "on" } else { "off" },
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::engine::ManualClock;
    use crate::events::EventBus;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn handler() -> (RequestHandler, TempDir) {
        let dir = TempDir::new().unwrap();
        let gateway = Gateway::new(dir.path().join("settings.json"));
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        ));
        let controller = TimerController::new(
            AppConfig::default(),
            EventBus::new(),
            clock.clone(),
        );
        (
            RequestHandler::new(Arc::new(Mutex::new(controller)), gateway, clock),
            dir,
        )
    }

    fn temp_socket_path() -> PathBuf {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.sock");
        std::mem::forget(dir);
        path
    }

    mod ipc_server_tests {
        use super::*;

        #[tokio::test]
        async fn test_bind_creates_socket() {
            let path = temp_socket_path();
            let server = IpcServer::bind(&path).unwrap();

            assert!(path.exists());
            drop(server);
            assert!(!path.exists());
        }

        #[tokio::test]
        async fn test_bind_replaces_stale_socket_file() {
            let path = temp_socket_path();
            std::fs::write(&path, "stale").unwrap();

            assert!(IpcServer::bind(&path).is_ok());
        }

        #[tokio::test]
        async fn test_bind_creates_parent_directory() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("nested").join("test.sock");

            let server = IpcServer::bind(&path);
            assert!(server.is_ok());
        }

        #[tokio::test]
        async fn test_request_response_round_trip() {
            let path = temp_socket_path();
            let server = IpcServer::bind(&path).unwrap();

            let client_path = path.clone();
            let client = tokio::spawn(async move {
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                stream
                    .write_all(br#"{"command":"status"}"#)
                    .await
                    .unwrap();
                stream.flush().await.unwrap();

                let mut buf = Vec::new();
                stream.read_to_end(&mut buf).await.unwrap();
                serde_json::from_slice::<IpcResponse>(&buf).unwrap()
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await.unwrap();
            assert!(matches!(request, IpcRequest::Status));

            let response = IpcResponse::success("ok", None);
            IpcServer::send_response(&mut stream, &response).await.unwrap();
            drop(stream);

            let received = client.await.unwrap();
            assert_eq!(received.status, "success");
        }

        #[tokio::test]
        async fn test_malformed_request_is_rejected() {
            let path = temp_socket_path();
            let server = IpcServer::bind(&path).unwrap();

            let client_path = path.clone();
            tokio::spawn(async move {
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                stream.write_all(b"not json").await.unwrap();
                stream.flush().await.unwrap();
                // hold the stream open until the server has read
                tokio::time::sleep(Duration::from_millis(100)).await;
            });

            let mut stream = server.accept().await.unwrap();
            let result = IpcServer::receive_request(&mut stream).await;
            assert!(result.is_err());
        }
    }

    mod request_handler_tests {
        use super::*;

        #[tokio::test]
        async fn test_status_reports_idle_work() {
            let (handler, _dir) = handler();

            let response = handler.handle(IpcRequest::Status).await;

            assert_eq!(response.status, "success");
            let data = response.data.unwrap();
            assert_eq!(data.mode.as_deref(), Some("work"));
            assert_eq!(data.is_running, Some(false));
        }

        #[tokio::test]
        async fn test_start_then_status() {
            let (handler, _dir) = handler();

            let response = handler
                .handle(IpcRequest::Start {
                    params: StartParams::default(),
                })
                .await;
            assert_eq!(response.status, "success");
            assert_eq!(response.data.unwrap().is_running, Some(true));
        }

        #[tokio::test]
        async fn test_start_with_overrides_persists_config() {
            let (handler, _dir) = handler();

            handler
                .handle(IpcRequest::Start {
                    params: StartParams {
                        work_minutes: Some(90),
                        break_minutes: Some(20),
                    },
                })
                .await;

            let controller = handler.controller.lock().await;
            assert_eq!(controller.config().work_minutes, 90);
            let stored = handler
                .gateway
                .load(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap());
            assert_eq!(stored.config.work_minutes, 90);
        }

        #[tokio::test]
        async fn test_start_while_running_succeeds_without_restart() {
            let (handler, _dir) = handler();
            handler
                .handle(IpcRequest::Start {
                    params: StartParams::default(),
                })
                .await;

            let response = handler
                .handle(IpcRequest::Start {
                    params: StartParams::default(),
                })
                .await;

            assert_eq!(response.status, "success");
            assert!(response.message.contains("already"));
        }

        #[tokio::test]
        async fn test_stop_and_reset() {
            let (handler, _dir) = handler();
            handler
                .handle(IpcRequest::Start {
                    params: StartParams::default(),
                })
                .await;

            let response = handler.handle(IpcRequest::Stop).await;
            assert_eq!(response.data.unwrap().is_running, Some(false));

            let response = handler.handle(IpcRequest::Reset).await;
            let data = response.data.unwrap();
            assert_eq!(data.mode.as_deref(), Some("work"));
            assert_eq!(data.remaining_seconds, Some(25 * 60));
        }

        #[tokio::test]
        async fn test_stats_returns_summary() {
            let (handler, _dir) = handler();

            let response = handler.handle(IpcRequest::Stats { days: Some(3) }).await;

            assert_eq!(response.status, "success");
            let summary = response.data.unwrap().stats.unwrap();
            assert_eq!(summary.days.len(), 3);
            assert_eq!(summary.total_sessions, 0);
        }

        #[tokio::test]
        async fn test_config_update_applies_and_persists() {
            let (handler, _dir) = handler();

            let response = handler
                .handle(IpcRequest::Config {
                    params: ConfigParams {
                        work_minutes: Some(50),
                        prompts_enabled: Some(false),
                        ..ConfigParams::default()
                    },
                })
                .await;
            assert_eq!(response.status, "success");

            let controller = handler.controller.lock().await;
            assert_eq!(controller.config().work_minutes, 50);
            assert!(!controller.config().prompt.enabled);
        }

        #[tokio::test]
        async fn test_config_without_fields_describes_settings() {
            let (handler, _dir) = handler();

            let response = handler
                .handle(IpcRequest::Config {
                    params: ConfigParams::default(),
                })
                .await;

            assert_eq!(response.status, "success");
            assert!(response.message.contains("work: 25m"));
        }

        #[tokio::test]
        async fn test_config_rejects_oversized_wire_durations() {
            let (handler, _dir) = handler();

            // a raw socket client is not bound by the CLI's value ranges
            let request: IpcRequest =
                serde_json::from_str(r#"{"command":"config","workMinutes":4294967295}"#).unwrap();
            let response = handler.handle(request).await;
            assert_eq!(response.status, "success");

            let controller = handler.controller.lock().await;
            assert_eq!(controller.config().work_minutes, 25);
            assert_eq!(controller.state().total_work_seconds, 25 * 60);
        }

        #[tokio::test]
        async fn test_config_keeps_interval_bounds_ordered() {
            let (handler, _dir) = handler();

            handler
                .handle(IpcRequest::Config {
                    params: ConfigParams {
                        prompt_min_minutes: Some(40),
                        ..ConfigParams::default()
                    },
                })
                .await;

            let controller = handler.controller.lock().await;
            let prompt = &controller.config().prompt;
            assert!(prompt.min_interval_minutes <= prompt.max_interval_minutes);
            assert_eq!(prompt.max_interval_minutes, 40);
        }
    }
}
