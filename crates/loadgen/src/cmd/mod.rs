use std::{
    fmt,
    num::ParseIntError,
    ops::{Deref, DerefMut},
};

use sarge::{ArgumentType, prelude::*};

use crate::impl_deref_mut;

pub const SERVER_ADDR: &str = "SERVER_ADDR";
pub const REQUESTS_PER_SECOND: &str = "REQUESTS_PER_SECOND";

sarge! {
    #[derive(Debug)]
    pub Args,

    /// The URL every request of a burst is sent to.
    #err 's' @SERVER_ADDR pub server_addr: String,

    /// Requests fired per tick.
    #err 'n' @REQUESTS_PER_SECOND pub requests_per_second: BurstSize,

    /// log level: "" means no log, v - info, vv - debug, vvv - trace
    #ok 'v' @LOADGEN_LOG_LEVEL pub log_level: LogLevel = LogLevel::default(),

    /// log with color?
    #ok @LOADGEN_LOG_COLORED pub colored: bool = false,

    /// help
    #ok 'h' pub help: bool = false,
}

/// Settings read once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The URL every request of a burst is sent to.
    pub target_url: String,
    /// Burst size. Not validated here: a non-positive value reaches the
    /// burst executor, which sends nothing.
    pub requests_per_second: i64,
}

impl Config {
    /// Takes the required settings out of `args`, `SERVER_ADDR` first.
    pub fn from_args(args: &mut Args) -> Result<Config, ConfigError> {
        let target_url = match args.server_addr.take() {
            None => return Err(ConfigError::Missing(SERVER_ADDR)),
            Some(Ok(url)) => url,
            Some(Err(never)) => match never {},
        };
        let requests_per_second = match args.requests_per_second.take() {
            None => return Err(ConfigError::Missing(REQUESTS_PER_SECOND)),
            Some(Ok(size)) => *size,
            Some(Err(source)) => return Err(ConfigError::InvalidBurstSize(source)),
        };

        Ok(Config {
            target_url,
            requests_per_second,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// A required variable is not set at all.
    Missing(&'static str),
    InvalidBurstSize(ParseIntError),
}

impl ConfigError {
    /// Errors that end the process on the spot, with their exit code.
    /// Anything else is propagated out of `main`.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ConfigError::Missing(_) => Some(1),
            ConfigError::InvalidBurstSize(_) => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{var} env variable is not defined"),
            ConfigError::InvalidBurstSize(source) => {
                write!(f, "{REQUESTS_PER_SECOND} is not an integer: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Missing(_) => None,
            ConfigError::InvalidBurstSize(source) => Some(source),
        }
    }
}

/// Base-10 burst size; surrounding whitespace is ignored, the sign is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstSize(i64);

impl ArgumentType for BurstSize {
    type Error = ParseIntError;

    fn from_value(val: Option<&str>) -> sarge::ArgResult<Self> {
        Some(val?.trim().parse::<i64>().map(BurstSize))
    }
}

impl_deref_mut!(BurstSize(i64));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLevel(String);

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel("info".into())
    }
}

impl ArgumentType for LogLevel {
    type Error = ArgParseError;

    fn from_value(val: Option<&str>) -> sarge::ArgResult<Self> {
        const VERBOSE_PAT: char = 'v';

        if let Some(v) = val {
            let v = v.trim().to_ascii_lowercase();
            let level_str = match v.as_str() {
                "" | "off" => "off",
                "err" | "error" => "error",
                "warn" | "warning" => "warn",
                "info" => "info",
                "debug" => "debug",
                "trace" => "trace",
                s if s.chars().all(|c| c == VERBOSE_PAT) => match s.len() {
                    1 => "info",
                    2 => "debug",
                    _ => "trace",
                },
                // unknown names keep the default rather than silencing output
                _ => "info",
            };

            return Ok(LogLevel(level_str.into())).into();
        }

        Ok(LogLevel::default()).into()
    }
}

impl_deref_mut!(LogLevel(String));
