//! Command Module
//!
//! Parsing and execution of SET, GET, QPUSH, QPOP and BQPOP.

mod dispatcher;
mod parser;

#[cfg(test)]
mod property_tests;

pub use dispatcher::{Dispatcher, OK};
pub use parser::{Command, SetCondition};
