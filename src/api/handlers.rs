//! API Handlers
//!
//! HTTP request handlers for each server endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::warn;

use crate::cache::Store;
use crate::command::Dispatcher;
use crate::config::Config;
use crate::error::{KvError, Result};
use crate::models::{CommandRequest, CommandResponse, HealthResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Command engine over the shared store
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Creates a new AppState around the given dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Creates a new AppState from configuration with a fresh store.
    pub fn from_config(config: &Config) -> Self {
        let dispatcher =
            Dispatcher::new(Arc::new(Store::new())).with_queue_capacity(config.queue_capacity);
        Self::new(dispatcher)
    }

    /// The store behind the dispatcher, for background tasks.
    pub fn store(&self) -> &Arc<Store> {
        self.dispatcher.store()
    }
}

/// Handler for POST /
///
/// Executes one command line and wraps the reply in the JSON envelope.
pub async fn command_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        KvError::InvalidRequest
    })?;

    let value = state.dispatcher.process(&req.command).await?;

    Ok(Json(CommandResponse::value(value)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::from_config(&Config::default())
    }

    async fn run(state: &AppState, command: &str) -> Result<Json<CommandResponse>> {
        let req = CommandRequest {
            command: command.to_string(),
        };
        command_handler(State(state.clone()), Ok(Json(req))).await
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let response = run(&state, "SET test_key test_value").await.unwrap();
        assert_eq!(response.value.as_deref(), Some("OK"));

        let response = run(&state, "GET test_key").await.unwrap();
        assert_eq!(response.value.as_deref(), Some("test_value"));
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = run(&state, "GET nonexistent").await;
        assert_eq!(result.unwrap_err(), KvError::KeyMissing);
    }

    #[tokio::test]
    async fn test_queue_handlers() {
        let state = test_state();

        run(&state, "QPUSH jobs a b").await.unwrap();
        let response = run(&state, "QPOP jobs").await.unwrap();
        assert_eq!(response.value.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_from_config_applies_queue_capacity() {
        let config = Config {
            queue_capacity: Some(1),
            ..Config::default()
        };
        let state = AppState::from_config(&config);

        run(&state, "QPUSH jobs a").await.unwrap();
        let result = run(&state, "QPUSH jobs b").await;
        assert_eq!(result.unwrap_err(), KvError::QueueFull("jobs".to_string()));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
