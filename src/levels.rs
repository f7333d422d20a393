// Copyright 2017 Dmytro Milinevskyi <dmilinevskyi@gmail.com>

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

// http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Severity of a log record.
///
/// The levels are ordered from the most verbose (`TRACE`)
/// to the most severe (`CRITICAL`).
#[allow(missing_docs)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    VERBOSE,
    INFO,
    NOTICE,
    WARN,
    ERROR,
    CRITICAL,
}

/// Log level conversion failure.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum LevelError {
    /// The numeric weight doesn't map to any log level.
    #[error("Unsupported log level {0}")]
    Unsupported(isize),
    /// The name doesn't match any log level.
    #[error("Unknown log level '{0}'")]
    Unknown(String),
}

impl From<LogLevel> for isize {
    fn from(orig: LogLevel) -> isize {
        match orig {
            LogLevel::TRACE => -30,
            LogLevel::DEBUG => -20,
            LogLevel::VERBOSE => -10,
            LogLevel::INFO => 0,
            LogLevel::NOTICE => 10,
            LogLevel::WARN => 20,
            LogLevel::ERROR => 30,
            LogLevel::CRITICAL => 40,
        }
    }
}

impl TryFrom<isize> for LogLevel {
    type Error = LevelError;

    #[inline(always)]
    fn try_from(orig: isize) -> Result<Self, Self::Error> {
        match orig {
            -30 => Ok(LogLevel::TRACE),
            -20 => Ok(LogLevel::DEBUG),
            -10 => Ok(LogLevel::VERBOSE),
            0 => Ok(LogLevel::INFO),
            10 => Ok(LogLevel::NOTICE),
            20 => Ok(LogLevel::WARN),
            30 => Ok(LogLevel::ERROR),
            40 => Ok(LogLevel::CRITICAL),
            _ => Err(LevelError::Unsupported(orig)),
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(orig: log::Level) -> LogLevel {
        match orig {
            log::Level::Trace => LogLevel::TRACE,
            log::Level::Debug => LogLevel::DEBUG,
            log::Level::Info => LogLevel::INFO,
            log::Level::Warn => LogLevel::WARN,
            log::Level::Error => LogLevel::ERROR,
        }
    }
}

/// All log levels in ascending order.
pub const LEVELS: [LogLevel; 8] = [
    LogLevel::TRACE,
    LogLevel::DEBUG,
    LogLevel::VERBOSE,
    LogLevel::INFO,
    LogLevel::NOTICE,
    LogLevel::WARN,
    LogLevel::ERROR,
    LogLevel::CRITICAL,
];

impl FromStr for LogLevel {
    type Err = LevelError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::TRACE),
            "DEBUG" => Ok(LogLevel::DEBUG),
            "VERBOSE" => Ok(LogLevel::VERBOSE),
            "INFO" => Ok(LogLevel::INFO),
            "NOTICE" => Ok(LogLevel::NOTICE),
            "WARN" | "WARNING" => Ok(LogLevel::WARN),
            "ERROR" => Ok(LogLevel::ERROR),
            "CRITICAL" | "FATAL" => Ok(LogLevel::CRITICAL),
            _ => Err(LevelError::Unknown(level.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            LogLevel::TRACE => "TRACE",
            LogLevel::DEBUG => "DEBUG",
            LogLevel::VERBOSE => "VERBOSE",
            LogLevel::INFO => "INFO",
            LogLevel::NOTICE => "NOTICE",
            LogLevel::WARN => "WARN",
            LogLevel::ERROR => "ERROR",
            LogLevel::CRITICAL => "CRITICAL",
        };
        f.pad(name)
    }
}
