//! IPC client for talking to the daemon over the Unix socket.
//!
//! One request per connection. Connection failures are retried with a
//! linear backoff so a daemon that is just starting up is not missed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing::warn;

use crate::types::{ConfigParams, IpcRequest, IpcResponse, StartParams};

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes
const MAX_RESPONSE_SIZE: usize = 65536;

/// Maximum connection attempts
const MAX_RETRIES: u32 = 3;

/// Base retry delay, multiplied by the attempt number
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// Client side of the daemon socket.
pub struct IpcClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl IpcClient {
    /// Creates a client against the default socket path.
    pub fn new() -> Result<Self> {
        Ok(Self::with_socket_path(crate::daemon::socket_path()?))
    }

    /// Creates a client against a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        }
    }

    pub fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }

    pub async fn start(&self, params: StartParams) -> Result<IpcResponse> {
        self.request(&IpcRequest::Start { params }).await
    }

    pub async fn stop(&self) -> Result<IpcResponse> {
        self.request(&IpcRequest::Stop).await
    }

    pub async fn reset(&self) -> Result<IpcResponse> {
        self.request(&IpcRequest::Reset).await
    }

    pub async fn status(&self) -> Result<IpcResponse> {
        self.request(&IpcRequest::Status).await
    }

    pub async fn stats(&self, days: u32) -> Result<IpcResponse> {
        self.request(&IpcRequest::Stats { days: Some(days) }).await
    }

    pub async fn config(&self, params: ConfigParams) -> Result<IpcResponse> {
        self.request(&IpcRequest::Config { params }).await
    }

    /// Sends a request, retrying transient failures, and maps an error
    /// status from the daemon into an `Err`.
    async fn request(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let response = self.send_with_retry(request).await?;
        if response.status == "error" {
            anyhow::bail!("{}", response.message);
        }
        Ok(response)
    }

    async fn send_with_retry(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match self.send(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!("request failed (attempt {attempt}/{MAX_RETRIES}): {e}");
                    last_error = Some(e);
                    if attempt < MAX_RETRIES {
                        let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap())
    }

    async fn send(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("connection timed out")?
            .context("cannot reach the daemon; run 'respite daemon' first")?;

        let request_json = serde_json::to_vec(request).context("failed to encode request")?;

        timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.write_all(&request_json),
        )
        .await
        .context("write timed out")?
        .context("failed to send request")?;

        timeout(Duration::from_secs(IO_TIMEOUT_SECS), stream.flush())
            .await
            .context("flush timed out")?
            .context("failed to flush request")?;

        // half-close signals end of request
        stream.shutdown().await.context("failed to shutdown write side")?;

        let mut buffer = vec![0u8; MAX_RESPONSE_SIZE];
        let n = timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await
        .context("read timed out")?
        .context("failed to read response")?;

        if n == 0 {
            anyhow::bail!("daemon closed the connection without responding");
        }

        serde_json::from_slice(&buffer[..n]).context("failed to decode response")
    }
}

// ============================================================================
// Tests
// ============================================================================
