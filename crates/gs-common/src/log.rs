// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 GridSentinel Labs

//! Logging infrastructure for GridSentinel
//!
//! A fixed-capacity circular log held in RAM; the newest entries overwrite
//! the oldest once the buffer is full. Entries can be drained over the
//! maintenance interface for post-incident analysis.
//!
//! Key material and payload contents must never be logged.

use core::fmt::{self, Write};
use heapless::String;

use crate::types::TimestampMs;

/// Maximum log message length in bytes
pub const MAX_LOG_MESSAGE_LEN: usize = 96;

/// Number of entries retained in the circular buffer
pub const LOG_BUFFER_SIZE: usize = 16;

/// Log severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Failures that require operator attention
    Error = 0,
    /// Degraded but recoverable conditions
    Warn = 1,
    /// Normal operational milestones
    Info = 2,
    /// Development diagnostics
    Debug = 3,
}

impl LogLevel {
    /// Single-character prefix used in rendered entries
    #[must_use]
    pub const fn prefix(&self) -> char {
        match self {
            Self::Error => 'E',
            Self::Warn => 'W',
            Self::Info => 'I',
            Self::Debug => 'D',
        }
    }
}

/// A single log entry
#[derive(Clone)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Millisecond timestamp from the monotonic clock
    pub timestamp: TimestampMs,
    /// Originating module tag
    pub module: &'static str,
    /// Message text, truncated to [`MAX_LOG_MESSAGE_LEN`]
    pub message: String<MAX_LOG_MESSAGE_LEN>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:010}] {} [{}] {}",
            self.timestamp,
            self.level.prefix(),
            self.module,
            self.message
        )
    }
}

/// Fixed-capacity circular log buffer
pub struct LogBuffer {
    entries: [Option<LogEntry>; LOG_BUFFER_SIZE],
    write_index: usize,
    count: usize,
    dropped: u32,
    min_level: LogLevel,
}

impl LogBuffer {
    /// Create an empty buffer recording `Info` and above
    #[must_use]
    pub const fn new() -> Self {
        const NONE: Option<LogEntry> = None;
        Self {
            entries: [NONE; LOG_BUFFER_SIZE],
            write_index: 0,
            count: 0,
            dropped: 0,
            min_level: LogLevel::Info,
        }
    }

    /// Set the minimum recorded level
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Check whether entries at `level` are recorded
    #[must_use]
    pub const fn should_log(&self, level: LogLevel) -> bool {
        (level as u8) <= (self.min_level as u8)
    }

    /// Record a formatted entry
    pub fn log(
        &mut self,
        level: LogLevel,
        timestamp: TimestampMs,
        module: &'static str,
        args: fmt::Arguments<'_>,
    ) {
        if !self.should_log(level) {
            return;
        }

        let mut message = String::new();
        // A message longer than the entry capacity is truncated, not dropped
        let _ = message.write_fmt(args);

        if self.count == LOG_BUFFER_SIZE {
            self.dropped = self.dropped.saturating_add(1);
        }

        self.entries[self.write_index] = Some(LogEntry {
            level,
            timestamp,
            module,
            message,
        });
        self.write_index = (self.write_index + 1) % LOG_BUFFER_SIZE;
        if self.count < LOG_BUFFER_SIZE {
            self.count += 1;
        }
    }

    /// Number of retained entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Check if the buffer is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of entries overwritten since the last clear
    #[must_use]
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Discard all entries
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
        self.write_index = 0;
        self.count = 0;
        self.dropped = 0;
    }

    /// Iterate over retained entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        let start = if self.count < LOG_BUFFER_SIZE {
            0
        } else {
            self.write_index
        };
        (0..self.count).filter_map(move |i| {
            self.entries[(start + i) % LOG_BUFFER_SIZE].as_ref()
        })
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Log an error-level message
#[macro_export]
macro_rules! log_error {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Error, $ts, $module, format_args!($($arg)*))
    };
}

/// Log a warning-level message
#[macro_export]
macro_rules! log_warn {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Warn, $ts, $module, format_args!($($arg)*))
    };
}

/// Log an info-level message
#[macro_export]
macro_rules! log_info {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Info, $ts, $module, format_args!($($arg)*))
    };
}

/// Log a debug-level message
#[macro_export]
macro_rules! log_debug {
    ($buffer:expr, $ts:expr, $module:expr, $($arg:tt)*) => {
        $buffer.log($crate::log::LogLevel::Debug, $ts, $module, format_args!($($arg)*))
    };
}
