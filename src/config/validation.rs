use crate::dialog::{DialogOptions, SessionConfig};
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - If log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
/// - Dialog defaults must merge into a valid session configuration
pub fn validate_config(
    log_file_path: &Option<String>,
    dialog: &DialogOptions,
) -> Result<(), AppError> {
    if let Some(log_path) = log_file_path {
        if log_path.trim().is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            // Try to create the directory to validate the path
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    SessionConfig::default()
        .merged(dialog)
        .map_err(|e| AppError::config_error(format!("Invalid [dialog] settings: {e}")))?;

    Ok(())
}
