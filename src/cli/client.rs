//! IPC client for communicating with the session daemon.
//!
//! This module provides:
//! - Unix Domain Socket client
//! - Request/response handling
//! - Connection retry logic
//! - Timeout handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::cli::commands::DurationArgs;
use crate::paths::AppPaths;
use crate::types::{IpcRequest, IpcResponse};

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: u64 = 65536;

/// Maximum retry attempts
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
#[derive(Debug, Clone)]
pub struct IpcClient {
    socket_path: PathBuf,
    timeout: Duration,
    retries: u32,
}

impl IpcClient {
    /// Creates a client for the default socket path.
    pub fn new() -> Result<Self> {
        let paths = AppPaths::resolve()?;
        Ok(Self::with_socket_path(paths.socket()))
    }

    /// Creates a new IPC client with a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
            retries: MAX_RETRIES,
        }
    }

    /// Uses `socket` if given, else the default path.
    pub fn from_option(socket: Option<PathBuf>) -> Result<Self> {
        match socket {
            Some(path) => Ok(Self::with_socket_path(path)),
            None => Self::new(),
        }
    }

    /// Disables retries; used by `watch`, which polls on its own schedule.
    pub fn without_retry(mut self) -> Self {
        self.retries = 1;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Starts or pauses the countdown.
    pub async fn toggle(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Toggle).await
    }

    /// Resets the session.
    pub async fn reset(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Reset).await
    }

    /// Sends a status query to the daemon.
    pub async fn status(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Status).await
    }

    /// Applies the given flags on top of the daemon's current configuration.
    pub async fn apply(&self, args: &DurationArgs) -> Result<IpcResponse> {
        let current = self
            .status()
            .await?
            .data
            .context("Daemon returned no session data")?;

        let request = IpcRequest::Apply {
            config: args.overlay(&current.config),
        };
        self.send_request_with_retry(&request).await
    }

    /// Sends a request to the daemon with retry logic.
    async fn send_request_with_retry(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut attempt = 1;

        loop {
            match self.send_request(request).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt >= self.retries => return Err(e),
                Err(e) => {
                    tracing::warn!("Request failed (attempt {}/{}): {:#}", attempt, self.retries, e);
                    let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Sends a single request to the daemon.
    async fn send_request(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("Connection timed out")?
            .with_context(|| {
                format!(
                    "Cannot connect to daemon at {}. Start it with 'pomoclock daemon'",
                    self.socket_path.display()
                )
            })?;

        let request_json = serde_json::to_vec(request).context("Failed to serialize request")?;

        let io_timeout = Duration::from_secs(IO_TIMEOUT_SECS);

        timeout(io_timeout, stream.write_all(&request_json))
            .await
            .context("Write timed out")?
            .context("Failed to send request")?;

        // Shutdown write side to signal end of request
        stream
            .shutdown()
            .await
            .context("Failed to close request stream")?;

        let mut buffer = Vec::new();
        timeout(
            io_timeout,
            (&mut stream).take(MAX_RESPONSE_SIZE).read_to_end(&mut buffer),
        )
        .await
        .context("Read timed out")?
        .context("Failed to receive response")?;

        if buffer.is_empty() {
            anyhow::bail!("No response from daemon");
        }

        let response: IpcResponse =
            serde_json::from_slice(&buffer).context("Failed to parse response")?;

        if !response.is_success() {
            anyhow::bail!("{}", response.message);
        }

        Ok(response)
    }
}

// ============================================================================
// Tests
// ============================================================================
