//! IPC server for the session daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - One JSON request and one JSON response per connection
//! - Dispatch of requests to the session actor

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::types::{IpcRequest, IpcResponse, SessionConfig, SessionSnapshot};

use super::actor::{SessionError, SessionHandle};

// ============================================================================
// Constants
// ============================================================================

/// Maximum request size in bytes (4KB)
pub const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

/// Reply message when a toggle starts the countdown.
pub const STARTED_MESSAGE: &str = "Timer started";
/// Reply message when a toggle pauses the countdown.
pub const PAUSED_MESSAGE: &str = "Timer paused";
/// Reply message after a reset.
pub const RESET_MESSAGE: &str = "Session reset";
/// Reply message after a configuration is applied.
pub const APPLIED_MESSAGE: &str = "Configuration applied";

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,

    /// Client closed the connection without sending anything
    #[error("Connection closed by client")]
    EmptyRequest,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        debug!("Listening on {}", socket_path.display());

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Reads one request, up to end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout, on an empty or oversized request, or if
    /// the payload is not a valid request.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = Vec::with_capacity(MAX_REQUEST_SIZE);
        let limit = (MAX_REQUEST_SIZE + 1) as u64;

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            (&mut *stream).take(limit).read_to_end(&mut buffer),
        )
        .await;

        match read_result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        }

        if buffer.is_empty() {
            return Err(IpcError::EmptyRequest.into());
        }
        if buffer.len() > MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge.into());
        }

        let request: IpcRequest =
            serde_json::from_slice(&buffer).context("Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
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

/// Handles IPC requests by forwarding them to the session actor.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    session: SessionHandle,
}

impl RequestHandler {
    /// Creates a new request handler forwarding to `session`.
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Toggle => self.handle_toggle().await,
            IpcRequest::Reset => respond(RESET_MESSAGE, self.session.reset().await),
            IpcRequest::Apply { config } => self.handle_apply(config).await,
            IpcRequest::Status => respond("", self.session.status().await),
        }
    }

    async fn handle_toggle(&self) -> IpcResponse {
        match self.session.toggle().await {
            Ok(snapshot) => {
                let message = if snapshot.is_running {
                    STARTED_MESSAGE
                } else {
                    PAUSED_MESSAGE
                };
                IpcResponse::success(message, Some(snapshot))
            }
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    async fn handle_apply(&self, config: SessionConfig) -> IpcResponse {
        respond(APPLIED_MESSAGE, self.session.apply(config).await)
    }

    /// Reads, handles and answers a single connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the response could not be written. A malformed
    /// request is answered with an error response.
    pub async fn serve_connection(&self, mut stream: UnixStream) -> Result<()> {
        let response = match IpcServer::receive_request(&mut stream).await {
            Ok(request) => {
                debug!("Received request: {:?}", request);
                self.handle(request).await
            }
            Err(e) => IpcResponse::error(format!("{:#}", e)),
        };

        IpcServer::send_response(&mut stream, &response).await
    }
}

fn respond(message: &str, result: std::result::Result<SessionSnapshot, SessionError>) -> IpcResponse {
    match result {
        Ok(snapshot) => IpcResponse::success(message, Some(snapshot)),
        Err(e) => IpcResponse::error(e.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================
