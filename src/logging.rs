//! Logger construction.
//!
//! A [`Logger`] is built once from [`LogConfig`] and installed as the default
//! dispatcher for the lifetime of the returned guard. Nothing here touches a
//! process-global subscriber, so tests can build and install their own.
//! stdout stays reserved for report summaries; log lines go to stderr or to
//! the configured file.

use crate::error::Result;
use clap::ValueEnum;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::dispatcher::{self, DefaultGuard, Dispatch};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING", alias = "WARN")]
    Warning,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            // tracing has no level above ERROR
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    /// When set, log lines go only to this file.
    pub file: Option<PathBuf>,
}

pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    pub fn new(config: &LogConfig) -> Result<Self> {
        let builder = tracing_subscriber::fmt()
            .with_max_level(config.level.filter())
            .with_target(false);

        let dispatch = match &config.file {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Dispatch::new(
                    builder
                        .with_ansi(false)
                        .with_writer(Mutex::new(file))
                        .finish(),
                )
            }
            None => Dispatch::new(builder.with_writer(std::io::stderr).finish()),
        };

        Ok(Self { dispatch })
    }

    /// Routes `tracing` events on this thread to the logger until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }
}
