// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Logging facade the CLI binary installs over `tracing`, plus a
//! `NoOpLogger` for library embedding and a capturing logger for tests.

use std::sync::{Arc, Mutex};

/// What the bootstrap layer logs through, independent of how `tracing` is
/// configured to route it.
pub trait BootstrapLogger: std::fmt::Debug + Send + Sync {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Routes through `tracing`'s macros under the `"bootstrap"` target, with
/// an optional prefix prepended to every message.
#[derive(Debug, Clone, Default)]
pub struct ConsoleLogger {
    prefix: Option<String>,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }

    fn format(&self, message: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{p}: {message}"),
            None => message.to_string(),
        }
    }
}

impl BootstrapLogger for ConsoleLogger {
    fn error(&self, message: &str) {
        tracing::error!(target: "bootstrap", "{}", self.format(message));
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "bootstrap", "{}", self.format(message));
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "bootstrap", "{}", self.format(message));
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "bootstrap", "{}", self.format(message));
    }
}

/// Discards everything. Useful when this crate is embedded rather than run
/// as the CLI binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl BootstrapLogger for NoOpLogger {
    fn error(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
}

/// Records every call instead of emitting it, so tests can assert on what
/// was logged without capturing stdout.
#[derive(Debug, Clone, Default)]
pub struct CapturingLogger {
    messages: Arc<Mutex<Vec<LogMessage>>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages.lock().expect("logger mutex poisoned").clone()
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.messages.lock().expect("logger mutex poisoned").push(LogMessage { level, message: message.to_string() });
    }
}

impl BootstrapLogger for CapturingLogger {
    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capturing_logger_records_level_and_message() {
        let logger = CapturingLogger::new();
        logger.info("starting up");
        logger.error("failed to resolve key");
        let messages = logger.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].level, LogLevel::Info);
        assert_eq!(messages[1].message, "failed to resolve key");
    }

    #[test]
    fn noop_logger_discards_everything() {
        let logger = NoOpLogger;
        logger.error("should not panic");
        logger.debug("nor this");
    }
}
