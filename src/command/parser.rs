//! Command Parser
//!
//! Turns a tokenized command into a typed [`Command`]. Only syntax is checked
//! here; anything that depends on the keyspace is left to the dispatcher.

use std::time::Duration;

use crate::error::{KvError, Result};

// == Set Condition ==
/// Existence precondition for SET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCondition {
    /// Only set if the key is absent
    Nx,
    /// Only set if the key is present
    Xx,
}

// == Command ==
/// A parsed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `SET key value [EX seconds] [NX|XX]`
    Set {
        key: String,
        value: String,
        expire_secs: Option<i64>,
        condition: Option<SetCondition>,
    },
    /// `GET key`
    Get { key: String },
    /// `QPUSH key value [value...]`
    QPush { key: String, values: Vec<String> },
    /// `QPOP key`
    QPop { key: String },
    /// `BQPOP key timeout`
    BQPop { key: String, timeout: Duration },
}

impl Command {
    // == Parse ==
    /// Parses a whitespace-tokenized command.
    ///
    /// The keyword and flags are case-insensitive; keys and values are taken
    /// verbatim.
    pub fn parse(tokens: &[&str]) -> Result<Self> {
        let (keyword, args) = tokens.split_first().ok_or(KvError::InvalidCommand)?;

        match keyword.to_ascii_uppercase().as_str() {
            "SET" => parse_set(args),
            "GET" => match args {
                [key] => Ok(Command::Get {
                    key: key.to_string(),
                }),
                _ => Err(KvError::InvalidCommand),
            },
            "QPUSH" => parse_qpush(args),
            "QPOP" => match args {
                [key] => Ok(Command::QPop {
                    key: key.to_string(),
                }),
                _ => Err(KvError::InvalidCommand),
            },
            "BQPOP" => match args {
                [key, timeout] => Ok(Command::BQPop {
                    key: key.to_string(),
                    timeout: parse_timeout(timeout)?,
                }),
                _ => Err(KvError::InvalidCommand),
            },
            "" => Err(KvError::InvalidCommand),
            _ => Err(KvError::UnknownCommand(keyword.to_string())),
        }
    }

    /// Upper-case keyword, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::QPush { .. } => "QPUSH",
            Command::QPop { .. } => "QPOP",
            Command::BQPop { .. } => "BQPOP",
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Command::Set { key, .. }
            | Command::Get { key }
            | Command::QPush { key, .. }
            | Command::QPop { key }
            | Command::BQPop { key, .. } => key.as_str(),
        }
    }
}

fn parse_set(args: &[&str]) -> Result<Command> {
    let [key, value, rest @ ..] = args else {
        return Err(KvError::InvalidCommand);
    };

    let mut rest = rest.iter();
    let mut flag = rest.next();
    let mut expire_secs = None;

    if flag.is_some_and(|token| token.eq_ignore_ascii_case("EX")) {
        let seconds = rest.next().ok_or(KvError::InvalidCommand)?;
        expire_secs = Some(
            seconds
                .parse::<i64>()
                .map_err(|_| KvError::InvalidCommand)?,
        );
        flag = rest.next();
    }

    // Unrecognised trailing tokens are ignored, not rejected
    let condition = flag.and_then(|token| {
        if token.eq_ignore_ascii_case("NX") {
            Some(SetCondition::Nx)
        } else if token.eq_ignore_ascii_case("XX") {
            Some(SetCondition::Xx)
        } else {
            None
        }
    });

    Ok(Command::Set {
        key: key.to_string(),
        value: value.to_string(),
        expire_secs,
        condition,
    })
}

fn parse_qpush(args: &[&str]) -> Result<Command> {
    let [key, values @ ..] = args else {
        return Err(KvError::InvalidCommand);
    };
    if values.is_empty() {
        return Err(KvError::InvalidCommand);
    }

    // Queue elements are whitespace-delimited tokens; anything else could
    // not be popped back out intact.
    if values
        .iter()
        .any(|value| value.is_empty() || value.contains(char::is_whitespace))
    {
        return Err(KvError::InvalidCommand);
    }

    Ok(Command::QPush {
        key: key.to_string(),
        values: values.iter().map(|value| value.to_string()).collect(),
    })
}

fn parse_timeout(token: &str) -> Result<Duration> {
    let seconds: f64 = token.parse().map_err(|_| KvError::InvalidCommand)?;

    Duration::try_from_secs_f64(seconds).map_err(|_| KvError::InvalidCommand)
}
