//! Cache Module
//!
//! In-memory keyspace with lazy and swept expiry, guarded by one
//! store-wide read/write lock.

mod keyspace;
mod record;
mod store;
mod waiters;

// Re-export public types
pub use keyspace::Keyspace;
pub use record::{current_timestamp_ms, Record};
pub use store::Store;
pub use waiters::{QueueWaiter, QueueWaiters};
