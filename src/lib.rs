//! Mini KV - A minimal in-memory key-value server
//!
//! String GET/SET with optional expiry and NX/XX conditions, plus a
//! whitespace-joined queue with push, pop and blocking pop, served over HTTP.

pub mod api;
pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use command::Dispatcher;
pub use config::Config;
pub use error::{KvError, Result};
pub use tasks::spawn_cleanup_task;
