//! On-screen status log

use std::collections::VecDeque;

use crate::error::{AppError, ErrorKind};

const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}

/// Bounded list of status lines, newest last
///
/// Every entry is also forwarded to the `log` facade.
#[derive(Debug)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info => log::info!("{}", message),
            LogLevel::Warn => log::warn!("{}", message),
            LogLevel::Error => log::error!("{}", message),
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry { level, message });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    /// Log a failed action; unmet preconditions are warnings
    pub fn report(&mut self, err: &AppError) {
        let level = match err.kind() {
            ErrorKind::Precondition => LogLevel::Warn,
            ErrorKind::Input | ErrorKind::External => LogLevel::Error,
        };
        self.push(level, err.to_string());
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptError;
    use crate::sheet::SheetError;

    #[test]
    fn test_entry_format() {
        let mut log = LogBuffer::default();
        log.info("Loaded Excel columns");
        assert_eq!(log.last().unwrap().to_string(), "[INFO] Loaded Excel columns");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = LogBuffer::with_capacity(2);
        log.info("one");
        log.warn("two");
        log.error("three");
        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_report_levels() {
        let mut log = LogBuffer::default();
        log.report(&AppError::from(ScriptError::EmptyMapping));
        assert_eq!(log.last().unwrap().level, LogLevel::Warn);

        log.report(&AppError::from(SheetError::NoSheets));
        assert_eq!(log.last().unwrap().level, LogLevel::Error);
    }
}
