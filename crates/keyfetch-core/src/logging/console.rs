//! Console logger implementation

use std::io::{self, Write};

use super::traits::{LogLevel, Logger};

/// Writes info to stdout and everything else to stderr
///
/// Messages below the minimum level (default `Info`) are dropped, so
/// per-request debug lines stay quiet unless asked for.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a console logger with the `[keyfetch]` prefix
    pub fn new() -> Self {
        Self {
            prefix: "[keyfetch]".to_string(),
            min_level: LogLevel::Info,
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::new()
        }
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Whether a message at `level` would be written
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Format one line, or `None` if the level is filtered out
    fn render(&self, level: LogLevel, message: &str) -> Option<String> {
        self.enabled(level)
            .then(|| format!("{} {}: {}", self.prefix, level.to_string().trim_end(), message))
    }

    fn emit(&self, level: LogLevel, message: &str) {
        let Some(line) = self.render(level, message) else {
            return;
        };
        // A closed stdout/stderr must not turn into a resolution failure.
        let _ = if level == LogLevel::Info {
            writeln!(io::stdout().lock(), "{}", line)
        } else {
            writeln!(io::stderr().lock(), "{}", line)
        };
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }
}
