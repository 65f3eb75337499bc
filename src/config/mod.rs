use crate::constants::{LOG_FILE_NAME, env_vars};
use crate::dialog::{DialogOptions, HeaderText, SessionConfig};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Defaults every dialog session merges its own options over.
    #[serde(default)]
    pub dialog: DialogOptions,
}

impl Config {
    /// Loads configuration from the default config file location.
    /// Falls back to the built-in defaults when no config file exists.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `WAITING_DIALOG_LOG_FILE` - Override log file path
    /// - `WAITING_DIALOG_TIMER_MS` - Override the default animation cadence
    /// - `WAITING_DIALOG_TIMEOUT_MS` - Override the default animation delay
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - Config file unreadable, malformed or invalid
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a custom file path without environment overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timer_ms) = std::env::var(env_vars::TIMER_MS)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.dialog.timer_ms = Some(timer_ms);
        }

        if let Some(timeout_ms) = std::env::var(env_vars::TIMEOUT_MS)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.dialog.timeout_ms = Some(timeout_ms);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(&self.log_file_path, &self.dialog)
    }

    /// Resolves the `[dialog]` table into the defaults of a controller.
    pub fn session_defaults(&self) -> Result<SessionConfig, AppError> {
        SessionConfig::default().merged(&self.dialog)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// Shows the built-in defaults when no config file exists.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let has_file = Path::new(&config_path).exists();

        let config = Config::load().await?;
        let defaults = config.session_defaults()?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        if !has_file {
            println!("(Not created yet, showing defaults)");
        }
        println!("────────────────────────────────────");
        println!("Dialog Header:");
        match &defaults.header_text {
            HeaderText::Hidden => println!("hidden"),
            HeaderText::FromMessage => println!("message (rank {})", defaults.header_size.get()),
            HeaderText::Text(text) => println!("\"{text}\" (rank {})", defaults.header_size.get()),
        }
        println!("────────────────────────────────────");
        println!("Dialog Size / Progress Type:");
        let progress_type = if defaults.progress_type.is_empty() {
            "default"
        } else {
            defaults.progress_type.as_str()
        };
        println!("{} / {progress_type}", defaults.dialog_size);
        println!("────────────────────────────────────");
        println!("Animation:");
        println!(
            "every {} ms after {} ms",
            defaults.timer.as_millis(),
            defaults.timeout.as_millis()
        );
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{LOG_FILE_NAME}");
            println!("(Default location)");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
log_file_path = "/custom/log/path"

[dialog]
header_text = "Please wait"
header_size = 2
dialog_size = "lg"
timer_ms = 250
"#;
        tokio::fs::write(&config_path, config_content)
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        assert_eq!(
            config.dialog.header_text,
            Some(HeaderText::Text("Please wait".to_string()))
        );
        assert_eq!(config.dialog.header_size, Some(2));
        assert_eq!(config.dialog.dialog_size.as_deref(), Some("lg"));
        assert_eq!(config.dialog.timer_ms, Some(250));
        assert_eq!(config.dialog.rtl, None);
    }

    #[tokio::test]
    async fn test_config_header_text_false_hides_header() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "[dialog]\nheader_text = false\n")
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        let defaults = config.session_defaults().unwrap();
        assert_eq!(defaults.header_text, HeaderText::Hidden);
    }

    #[tokio::test]
    async fn test_config_load_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "").await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert_eq!(config.log_file_path, None);

        let defaults = config.session_defaults().unwrap();
        assert_eq!(defaults.timer, Duration::from_millis(500));
        assert_eq!(defaults.dialog_size, "m");
        assert!(defaults.rtl);
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let original_config = Config {
            log_file_path: Some("/custom/log/path".to_string()),
            dialog: DialogOptions::new()
                .with_header_text(false)
                .with_progress_type("success")
                .with_rtl(false),
        };
        original_config
            .save_to_path(&config_path_str)
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(
            content.contains("[dialog]") && content.contains("header_text = false"),
            "Content should contain the dialog table. Content: {content}"
        );

        let loaded_config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(original_config.log_file_path, loaded_config.log_file_path);
        assert_eq!(loaded_config.dialog.header_text, Some(HeaderText::Hidden));
        assert_eq!(
            loaded_config.dialog.progress_type.as_deref(),
            Some("success")
        );
        assert_eq!(loaded_config.dialog.rtl, Some(false));
    }

    #[tokio::test]
    async fn test_config_save_creates_nested_directories() {
        let temp_dir = tempdir().unwrap();
        let config_dir = temp_dir.path().join("a").join("waiting_dialog");
        let config_path = config_dir.join("config.toml");
        Config::default()
            .save_to_path(&config_path.to_string_lossy())
            .await
            .unwrap();
        assert!(config_dir.exists());
        assert!(config_path.exists());
    }

    #[tokio::test]
    async fn test_config_malformed_toml_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "[dialog\nheader_size = ")
            .await
            .unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[tokio::test]
    async fn test_config_wrong_header_text_type() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "[dialog]\nheader_text = 3\n")
            .await
            .unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result.unwrap_err(), AppError::TomlDeserialize(_)));
    }

    #[tokio::test]
    async fn test_config_load_from_nonexistent_path() {
        let result = Config::load_from_path("/nonexistent/path/config.toml").await;
        assert!(matches!(result.unwrap_err(), AppError::Io(_)));
    }

    #[test]
    fn test_validate_rejects_bad_dialog_table() {
        let config = Config {
            log_file_path: None,
            dialog: DialogOptions::new().with_header_size(7),
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
        assert!(config.session_defaults().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var(env_vars::LOG_FILE, "/tmp/override.log");
            std::env::set_var(env_vars::TIMER_MS, "125");
            std::env::set_var(env_vars::TIMEOUT_MS, "not-a-number");
        }

        let mut config = Config::default();
        config.dialog.timeout_ms = Some(40);
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var(env_vars::LOG_FILE);
            std::env::remove_var(env_vars::TIMER_MS);
            std::env::remove_var(env_vars::TIMEOUT_MS);
        }

        assert_eq!(config.log_file_path.as_deref(), Some("/tmp/override.log"));
        assert_eq!(config.dialog.timer_ms, Some(125));
        // Unparseable values are ignored
        assert_eq!(config.dialog.timeout_ms, Some(40));
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains("waiting_dialog"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let log_dir_path = Config::get_log_dir_path();
        assert!(log_dir_path.contains("waiting_dialog"));
        assert!(log_dir_path.ends_with("logs"));
    }
}
