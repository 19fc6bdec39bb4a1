//! Error types for the key-value server
//!
//! Every command failure is a client error; none of them is fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::CommandResponse;

// == Kv Error Enum ==
/// Unified error type for command processing and request handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    /// Arity violation, unparseable number or malformed flag sequence
    #[error("invalid command")]
    InvalidCommand,

    /// Command keyword not recognised
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// SET ... NX against a live key
    #[error("key already exists")]
    KeyExists,

    /// SET ... XX against an absent key, or GET on an absent/expired key
    #[error("key does not exist")]
    KeyMissing,

    /// QPOP on an absent key or a queue with no tokens
    #[error("queue is empty")]
    EmptyQueue,

    /// QPUSH would exceed the configured queue capacity
    #[error("queue '{0}' is full")]
    QueueFull(String),

    /// BQPOP deadline passed without an element becoming available
    #[error("timed out waiting for queue '{0}'")]
    Timeout(String),

    /// Request body could not be decoded
    #[error("invalid request")]
    InvalidRequest,
}

impl KvError {
    /// HTTP status code reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            KvError::InvalidRequest => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for KvError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(CommandResponse::error(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the key-value server.
pub type Result<T> = std::result::Result<T, KvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(KvError::InvalidCommand.to_string(), "invalid command");
        assert_eq!(KvError::KeyExists.to_string(), "key already exists");
        assert_eq!(KvError::KeyMissing.to_string(), "key does not exist");
        assert_eq!(KvError::EmptyQueue.to_string(), "queue is empty");
        assert_eq!(
            KvError::UnknownCommand("FOO".to_string()).to_string(),
            "unknown command 'FOO'"
        );
        assert_eq!(
            KvError::QueueFull("jobs".to_string()).to_string(),
            "queue 'jobs' is full"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(KvError::KeyMissing.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            KvError::UnknownCommand("X".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            KvError::InvalidRequest.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = KvError::EmptyQueue.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "queue is empty");
        assert!(json.get("value").is_none());
    }
}
