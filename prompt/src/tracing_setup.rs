// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Logging goes to a file only. Prompts own the terminal while they run, so anything
//! written to stdout or stderr would corrupt the cursor arithmetic.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use miette::IntoDiagnostic;
use tracing_core::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt,
                         util::SubscriberInitExt,
                         Layer};

use crate::DEFAULT_LOG_FILE_PATH;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(it: LogLevel) -> Self {
        match it {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub level_filter: LevelFilter,
    pub log_file_path: PathBuf,
}

impl TracingConfig {
    #[must_use]
    pub fn new(level_filter: impl Into<LevelFilter>) -> Self {
        Self {
            level_filter: level_filter.into(),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        }
    }
}

/// Installs the global subscriber. Returns `false` without doing anything when the
/// level is [`LevelFilter::OFF`].
///
/// # Errors
///
/// Returns an error if the log file can't be opened, or a global subscriber is
/// already installed.
pub fn try_initialize_logging(tracing_config: TracingConfig) -> miette::Result<bool> {
    if tracing_config.level_filter == LevelFilter::OFF {
        return Ok(false);
    }

    let file = try_create_file_appender(&tracing_config.log_file_path)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(false)
        .with_thread_names(true)
        .with_target(false)
        .with_writer(file)
        .with_filter(tracing_config.level_filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .into_diagnostic()?;

    tracing::debug!(
        message = "logging initialized",
        path = %tracing_config.log_file_path.display()
    );
    Ok(true)
}

/// Opens `path` for appending, without rotation.
///
/// # Errors
///
/// Returns an error if `path` has no parent folder or file name, or the file can't
/// be created.
pub fn try_create_file_appender(
    path: &Path,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let parent = path.parent().ok_or_else(|| {
        miette::miette!(
            "Can't access the folder of {}. It might not exist, or permissions are missing.",
            path.display()
        )
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or permissions are missing.",
            path.display()
        )
    })?;

    tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(tracing_appender::rolling::Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(parent)
        .into_diagnostic()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_log_level_maps_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::OFF);
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::DEBUG);
        assert_eq!(TracingConfig::new(LogLevel::Warn).level_filter, LevelFilter::WARN);
    }

    #[serial]
    #[test]
    fn test_off_does_not_install_anything() {
        let tracing_config = TracingConfig {
            level_filter: LevelFilter::OFF,
            log_file_path: PathBuf::new(),
        };
        assert!(!try_initialize_logging(tracing_config).unwrap());
    }

    #[serial]
    #[test]
    fn test_file_appender() {
        let path = std::env::temp_dir().join("r3bl_prompt_tracing_setup_test.log");
        assert!(try_create_file_appender(&path).is_ok());
        assert!(path.exists());
        drop(std::fs::remove_file(&path));

        assert!(try_create_file_appender(Path::new("")).is_err());
    }
}
