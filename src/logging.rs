/*
 * Installs the process-wide logger used by the toolkit's `log` macros: a
 * terminal logger, plus a file logger when `ToolkitConfig::log_file` is set.
 * Applications that install their own `log` backend simply skip this.
 */
use crate::core::ToolkitConfig;
use crate::core::path_utils;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;

#[derive(Debug)]
pub enum LoggingError {
    Io(io::Error),
    AlreadyInitialized(log::SetLoggerError),
}

impl From<io::Error> for LoggingError {
    fn from(err: io::Error) -> Self {
        LoggingError::Io(err)
    }
}

impl From<log::SetLoggerError> for LoggingError {
    fn from(err: log::SetLoggerError) -> Self {
        LoggingError::AlreadyInitialized(err)
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::Io(e) => write!(f, "Could not open log file: {e}"),
            LoggingError::AlreadyInitialized(e) => write!(f, "Logger already installed: {e}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggingError::Io(e) => Some(e),
            LoggingError::AlreadyInitialized(e) => Some(e),
        }
    }
}

fn log_config() -> simplelog::Config {
    ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Trace)
        .set_location_level(LevelFilter::Off)
        .build()
}

// Creates the loggers described by `config` without installing them.
pub(crate) fn build_loggers(
    config: &ToolkitConfig,
) -> Result<Vec<Box<dyn SharedLogger>>, LoggingError> {
    let level = config.log_level_filter();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &config.log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            path_utils::ensure_dir_exists(parent);
        }
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(level, log_config(), file));
    }
    Ok(loggers)
}

/*
 * Installs the loggers for the whole process. Only the first successful call
 * has an effect; later calls return `LoggingError::AlreadyInitialized`.
 */
pub fn initialize_logging(config: &ToolkitConfig) -> Result<(), LoggingError> {
    let loggers = build_loggers(config)?;
    CombinedLogger::init(loggers)?;
    log::debug!(
        "Logging: Initialized at level {} (file: {:?}).",
        config.log_level_filter(),
        config.log_file
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_loggers_terminal_only_by_default() {
        let loggers = build_loggers(&ToolkitConfig::default()).unwrap();
        assert_eq!(loggers.len(), 1);
    }

    #[test]
    fn test_build_loggers_adds_file_logger_and_creates_parent() {
        // Arrange
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("logs").join("lightgui.log");
        let config = ToolkitConfig {
            log_level: "debug".to_string(),
            log_file: Some(log_path.clone()),
            ..ToolkitConfig::default()
        };

        // Act
        let loggers = build_loggers(&config).unwrap();

        // Assert
        assert_eq!(loggers.len(), 2);
        assert!(log_path.exists());
        assert!(loggers.iter().all(|l| l.level() == LevelFilter::Debug));
    }

    #[test]
    fn test_build_loggers_reports_unwritable_file() {
        let dir = tempdir().unwrap();
        let config = ToolkitConfig {
            // A directory cannot be opened as a log file.
            log_file: Some(dir.path().to_path_buf()),
            ..ToolkitConfig::default()
        };
        assert!(matches!(build_loggers(&config), Err(LoggingError::Io(_))));
    }
}
