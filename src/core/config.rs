/*
 * Manages the toolkit's tunable settings: registry capacities, the event loop
 * frame interval, backend names (X11 font, Win32 window class, first control
 * id) and the logging setup. Settings are persisted as JSON in the standard
 * per-user local configuration directory.
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) so that tests and
 * embedding applications can provide their own storage. The concrete
 * implementation (`CoreConfigManager`) reads and writes files below the
 * directory returned by `path_utils::get_base_app_config_local_dir`.
 */
use crate::core::path_utils;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_FILENAME: &str = "lightgui_config.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoProjectDirectory,
    Parse(serde_json::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine project directory for configuration")
            }
            ConfigError::Parse(e) => write!(f, "Configuration file parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings consumed by the toolkit and its platform backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Number of window slots the registry reserves up front.
    pub initial_window_capacity: usize,
    /// Number of widget slots each new window reserves up front.
    pub initial_widget_capacity: usize,
    /// Sleep between two iterations of `Toolkit::run`, in milliseconds.
    pub frame_interval_ms: u64,
    /// Core X font used to draw widget text.
    pub x11_font: String,
    /// First native control identifier handed out by the Win32 backend.
    pub first_control_id: i32,
    /// Name under which the Win32 backend registers its window class.
    pub window_class_name: String,
    /// Maximum level passed to the logger, e.g. "info" or "debug".
    pub log_level: String,
    /// Optional file that receives a copy of every log line.
    pub log_file: Option<PathBuf>,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        ToolkitConfig {
            initial_window_capacity: 10,
            initial_widget_capacity: 20,
            frame_interval_ms: 10,
            x11_font: "fixed".to_string(),
            first_control_id: 1000,
            window_class_name: "LightGUI_Window".to_string(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl ToolkitConfig {
    // Parses `log_level` into a filter. Unknown names fall back to `Info`.
    pub fn log_level_filter(&self) -> LevelFilter {
        match self.log_level.trim().parse::<LevelFilter>() {
            Ok(level) => level,
            Err(_) => {
                log::warn!(
                    "ToolkitConfig: Unknown log level '{}', using 'info'.",
                    self.log_level
                );
                LevelFilter::Info
            }
        }
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    fn load_config(&self, app_name: &str) -> Result<Option<ToolkitConfig>>;
    fn save_config(&self, app_name: &str, config: &ToolkitConfig) -> Result<()>;
}

/*
 * Reads a configuration file. A missing or blank file yields `Ok(None)` so the
 * caller can fall back to `ToolkitConfig::default()`.
 */
pub(crate) fn read_config_file(file_path: &Path) -> Result<Option<ToolkitConfig>> {
    if !file_path.exists() {
        log::debug!("CoreConfigManager: Config file {file_path:?} does not exist.");
        return Ok(None);
    }
    let contents = std::fs::read_to_string(file_path)?;
    if contents.trim().is_empty() {
        log::debug!("CoreConfigManager: Config file {file_path:?} is empty.");
        return Ok(None);
    }
    let config = serde_json::from_str(&contents)?;
    log::debug!("CoreConfigManager: Loaded config from {file_path:?}.");
    Ok(Some(config))
}

pub(crate) fn write_config_file(file_path: &Path, config: &ToolkitConfig) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, config)?;
    writer.flush()?;
    log::debug!("CoreConfigManager: Saved config to {file_path:?}.");
    Ok(())
}

pub struct CoreConfigManager {}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {}
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_config(&self, app_name: &str) -> Result<Option<ToolkitConfig>> {
        log::trace!("CoreConfigManager: Loading config for app '{app_name}'");
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoProjectDirectory)?;
        read_config_file(&config_dir.join(CONFIG_FILENAME))
    }

    fn save_config(&self, app_name: &str, config: &ToolkitConfig) -> Result<()> {
        log::trace!("CoreConfigManager: Saving config for app '{app_name}'");
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoProjectDirectory)?;
        write_config_file(&config_dir.join(CONFIG_FILENAME), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // Stores the configuration in a caller-provided directory instead of the user profile.
    struct TestConfigManager {
        mock_config_dir: PathBuf,
    }

    impl ConfigManagerOperations for TestConfigManager {
        fn load_config(&self, _app_name: &str) -> Result<Option<ToolkitConfig>> {
            read_config_file(&self.mock_config_dir.join(CONFIG_FILENAME))
        }

        fn save_config(&self, _app_name: &str, config: &ToolkitConfig) -> Result<()> {
            write_config_file(&self.mock_config_dir.join(CONFIG_FILENAME), config)
        }
    }

    #[test]
    fn test_default_config_values() {
        let config = ToolkitConfig::default();
        assert_eq!(config.initial_window_capacity, 10);
        assert_eq!(config.initial_widget_capacity, 20);
        assert_eq!(config.frame_interval_ms, 10);
        assert_eq!(config.x11_font, "fixed");
        assert_eq!(config.first_control_id, 1000);
        assert_eq!(config.window_class_name, "LightGUI_Window");
        assert_eq!(config.log_level_filter(), LevelFilter::Info);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        // Arrange
        let dir = tempdir().unwrap();
        let manager = TestConfigManager {
            mock_config_dir: dir.path().to_path_buf(),
        };
        let config = ToolkitConfig {
            frame_interval_ms: 16,
            log_level: "debug".to_string(),
            log_file: Some(dir.path().join("lightgui.log")),
            ..ToolkitConfig::default()
        };

        // Act
        manager.save_config("AnyApp", &config).unwrap();
        let loaded = manager.load_config("AnyApp").unwrap();

        // Assert
        assert_eq!(loaded, Some(config));
    }

    #[test]
    fn test_load_config_missing_file_returns_none() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager {
            mock_config_dir: dir.path().to_path_buf(),
        };
        assert!(manager.load_config("AnyApp").unwrap().is_none());
    }

    #[test]
    fn test_load_config_empty_file_returns_none() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join(CONFIG_FILENAME)).unwrap();
        let manager = TestConfigManager {
            mock_config_dir: dir.path().to_path_buf(),
        };
        assert!(manager.load_config("AnyApp").unwrap().is_none());
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        // Arrange
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "x11_font": "9x15", "frame_interval_ms": 33 }"#,
        )
        .unwrap();
        let manager = TestConfigManager {
            mock_config_dir: dir.path().to_path_buf(),
        };

        // Act
        let loaded = manager.load_config("AnyApp").unwrap().unwrap();

        // Assert
        assert_eq!(loaded.x11_font, "9x15");
        assert_eq!(loaded.frame_interval_ms, 33);
        assert_eq!(loaded.initial_window_capacity, 10);
        assert_eq!(loaded.window_class_name, "LightGUI_Window");
    }

    #[test]
    fn test_malformed_config_is_a_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        let manager = TestConfigManager {
            mock_config_dir: dir.path().to_path_buf(),
        };
        assert!(matches!(
            manager.load_config("AnyApp"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = ToolkitConfig {
            log_level: "chatty".to_string(),
            ..ToolkitConfig::default()
        };
        assert_eq!(config.log_level_filter(), LevelFilter::Info);

        let config = ToolkitConfig {
            log_level: " Trace ".to_string(),
            ..ToolkitConfig::default()
        };
        assert_eq!(config.log_level_filter(), LevelFilter::Trace);
    }

    #[test]
    fn test_core_config_manager_save_and_load() {
        // Arrange
        let unique_app_name = format!("TestApp_LightGuiConfig_{}", rand::random::<u64>());
        let manager = CoreConfigManager::new();
        let config = ToolkitConfig {
            initial_widget_capacity: 64,
            ..ToolkitConfig::default()
        };

        // Act
        manager.save_config(&unique_app_name, &config).unwrap();
        let loaded = manager.load_config(&unique_app_name).unwrap();

        // Assert
        assert_eq!(loaded, Some(config));

        // Cleanup
        if let Some(config_dir) = path_utils::get_base_app_config_local_dir(&unique_app_name) {
            if let Err(e) = fs::remove_dir_all(&config_dir) {
                eprintln!("Test cleanup failed for config dir {config_dir:?}: {e}");
            }
        }
    }
}
