//! Request DTOs for the key-value server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for `POST /`
///
/// # Fields
/// - `command`: a single command line, e.g. `"SET name alice EX 60 NX"`
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    /// The command line to execute
    pub command: String,
}
