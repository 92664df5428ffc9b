/*
[INPUT]:  Error sources (transport, codec, protocol, streamer rejections)
[OUTPUT]: Structured error types with context for callers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Main error type for the TDA streamer adapter
#[derive(Error, Debug)]
pub enum TdaStreamError {
    /// WebSocket transport failed or the remote end closed the socket
    #[error("websocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// No live connection to the streamer
    #[error("not connected to the streamer")]
    NotConnected,

    /// Inbound wire text could not be decoded into an envelope
    #[error("failed to decode stream message: {message}")]
    Decode { message: String },

    /// Outbound request could not be serialized
    #[error("failed to encode stream request: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response matched the request id but not the expected service/command
    #[error(
        "response for request {request_id} matched an unexpected exchange: \
         expected {expected_service}/{expected_command}, got {service}/{command}"
    )]
    ProtocolMismatch {
        request_id: u64,
        expected_service: String,
        expected_command: String,
        service: String,
        command: String,
    },

    /// Control request was answered with a non-zero status code
    #[error("{service} {command} rejected by streamer (code {code}): {msg}")]
    Rejected {
        service: String,
        command: String,
        code: i64,
        msg: String,
    },

    /// Session inputs supplied by the caller are unusable
    #[error("invalid streamer session: {0}")]
    Session(String),
}

impl TdaStreamError {
    /// Check whether the error ends the current streamer session.
    ///
    /// Transport loss is terminal: the caller must reconnect and re-login.
    /// Rejections and protocol mismatches leave the session usable.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TdaStreamError::Transport(_) | TdaStreamError::NotConnected
        )
    }

    /// Check whether the streamer understood the request but refused it
    pub fn is_rejection(&self) -> bool {
        matches!(self, TdaStreamError::Rejected { .. })
    }

    /// Rejection status code, if the error carries one
    pub fn rejection_code(&self) -> Option<i64> {
        match self {
            TdaStreamError::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for streamer operations
pub type Result<T> = std::result::Result<T, TdaStreamError>;
