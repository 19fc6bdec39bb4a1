//! Command Dispatcher
//!
//! Executes parsed commands against an injected [`Store`].
//!
//! SET, QPUSH and QPOP hold the exclusive lock for their whole
//! validate-then-mutate sequence. GET reads under the shared lock and only
//! takes the exclusive lock to lazily delete an expired key.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{current_timestamp_ms, Record, Store};
use crate::command::{Command, SetCondition};
use crate::error::{KvError, Result};

/// Reply for commands that succeed without producing a value.
pub const OK: &str = "OK";

// == Dispatcher ==
/// Command processing engine.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    /// Shared keyspace
    store: Arc<Store>,
    /// Maximum tokens per queue, None = unbounded
    queue_capacity: Option<usize>,
}

impl Dispatcher {
    // == Constructor ==
    /// Creates a dispatcher over `store` with unbounded queues.
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            queue_capacity: None,
        }
    }

    /// Bounds every queue to `capacity` tokens.
    pub fn with_queue_capacity(mut self, capacity: Option<usize>) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    // == Process ==
    /// Tokenizes a raw command string and executes it.
    pub async fn process(&self, input: &str) -> Result<String> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        self.execute(&tokens).await
    }

    /// Parses and executes an already tokenized command.
    pub async fn execute(&self, tokens: &[&str]) -> Result<String> {
        let command = Command::parse(tokens)?;
        debug!(command = command.name(), key = command.key(), "Executing command");

        let result = self.dispatch(command).await;
        if let Err(err) = &result {
            debug!(error = %err, "Command failed");
        }
        result
    }

    /// Executes a parsed command.
    pub async fn dispatch(&self, command: Command) -> Result<String> {
        match command {
            Command::Set {
                key,
                value,
                expire_secs,
                condition,
            } => self
                .set(&key, value, expire_secs, condition)
                .await
                .map(|()| OK.to_string()),
            Command::Get { key } => self.get(&key).await,
            Command::QPush { key, values } => {
                self.qpush(&key, &values).await.map(|()| OK.to_string())
            }
            Command::QPop { key } => self.qpop(&key).await,
            Command::BQPop { key, timeout } => self.bqpop(&key, timeout).await,
        }
    }

    // == Set ==
    /// Replaces the record for `key`.
    ///
    /// The key is lazily expired first so NX/XX see post-expiry state.
    pub async fn set(
        &self,
        key: &str,
        value: String,
        expire_secs: Option<i64>,
        condition: Option<SetCondition>,
    ) -> Result<()> {
        let mut keyspace = self.store.write().await;
        let now = current_timestamp_ms();

        if keyspace.remove_expired_key(key, now) {
            debug!(key = %key, "Lazily expired key before SET");
        }

        match condition {
            Some(SetCondition::Nx) if keyspace.exists(key) => return Err(KvError::KeyExists),
            Some(SetCondition::Xx) if !keyspace.exists(key) => return Err(KvError::KeyMissing),
            _ => {}
        }

        let record = match expire_secs {
            Some(seconds) => Record::expiring_in(value, seconds, now),
            None => Record::new(value),
        };
        keyspace.insert(key, record);

        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// Expired keys read as missing and are deleted on the way out.
    pub async fn get(&self, key: &str) -> Result<String> {
        {
            let keyspace = self.store.read().await;
            match keyspace.get(key) {
                None => return Err(KvError::KeyMissing),
                Some(record) if record.is_live(current_timestamp_ms()) => {
                    return Ok(record.value.clone());
                }
                Some(_) => {}
            }
        }

        self.expire_lazily(key).await;
        Err(KvError::KeyMissing)
    }

    /// Exclusive phase of GET's lazy expiry.
    ///
    /// The key may have been deleted or refreshed since the shared lock was
    /// released, so expiry is re-checked before deleting. Returns true if the
    /// key was removed.
    async fn expire_lazily(&self, key: &str) -> bool {
        let mut keyspace = self.store.write().await;
        let removed = keyspace.remove_expired_key(key, current_timestamp_ms());
        if removed {
            debug!(key = %key, "Lazily expired key on GET");
        }
        removed
    }

    // == Queue Push ==
    /// Appends `values` to the queue at `key`, creating it if absent.
    ///
    /// A live key keeps its expiry; an expired one is replaced by a fresh
    /// queue. With a capacity configured the push is all-or-nothing.
    pub async fn qpush(&self, key: &str, values: &[String]) -> Result<()> {
        if values.is_empty() {
            return Err(KvError::InvalidCommand);
        }

        {
            let mut keyspace = self.store.write().await;

            if keyspace.remove_expired_key(key, current_timestamp_ms()) {
                debug!(key = %key, "Lazily expired key before QPUSH");
            }

            let joined = values.join(" ");
            match keyspace.get_mut(key) {
                Some(record) => {
                    let queued = record.value.split_whitespace().count();
                    self.check_capacity(key, queued + values.len())?;

                    record.value.push(' ');
                    record.value.push_str(&joined);
                }
                None => {
                    self.check_capacity(key, values.len())?;
                    keyspace.insert(key, Record::new(joined));
                }
            }
        }

        debug!(key = %key, count = values.len(), "Pushed values to queue");
        self.store.waiters().notify(key);

        Ok(())
    }

    fn check_capacity(&self, key: &str, len: usize) -> Result<()> {
        match self.queue_capacity {
            Some(capacity) if len > capacity => Err(KvError::QueueFull(key.to_string())),
            _ => Ok(()),
        }
    }

    // == Queue Pop ==
    /// Removes and returns the last element of the queue at `key`.
    ///
    /// Draining the last element deletes the key.
    pub async fn qpop(&self, key: &str) -> Result<String> {
        let mut keyspace = self.store.write().await;

        if keyspace.remove_expired_key(key, current_timestamp_ms()) {
            debug!(key = %key, "Lazily expired key before QPOP");
        }

        let record = keyspace.get(key).ok_or(KvError::EmptyQueue)?;

        let mut tokens = record.value.split_whitespace();
        let popped = tokens.next_back().map(str::to_string);
        let remainder = tokens.collect::<Vec<_>>().join(" ");

        if remainder.is_empty() {
            keyspace.remove(key);
        } else if let Some(record) = keyspace.get_mut(key) {
            record.value = remainder;
        }

        popped.ok_or(KvError::EmptyQueue)
    }

    // == Blocking Queue Pop ==
    /// Pops from the queue at `key`, waiting up to `timeout` for an element.
    ///
    /// The store lock is never held while waiting. A zero timeout makes a
    /// single attempt. On timeout the store is left untouched.
    pub async fn bqpop(&self, key: &str, timeout: Duration) -> Result<String> {
        let deadline = blocking_deadline(Instant::now(), timeout);
        let waiter = self.store.waiters().subscribe(key);

        loop {
            let notified = waiter.notified();
            tokio::pin!(notified);
            // Register before checking so a push between the check and the
            // wait still wakes us.
            notified.as_mut().enable();

            match self.qpop(key).await {
                Err(KvError::EmptyQueue) => {}
                result => return result,
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                debug!(key = %key, ?timeout, "Blocking pop timed out");
                return Err(KvError::Timeout(key.to_string()));
            }
        }
    }
}

/// Upper bound on how long a blocking pop may wait.
const MAX_BLOCKING_WAIT: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Deadline `timeout` after `now`, capped so the addition cannot overflow.
fn blocking_deadline(now: Instant, timeout: Duration) -> Instant {
    now.checked_add(timeout.min(MAX_BLOCKING_WAIT)).unwrap_or(now)
}
