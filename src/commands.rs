use crate::cli::Args;
use crossterm::{execute, terminal::SetTitle};
use std::io::stdout;
use waiting_dialog::config::Config;
use waiting_dialog::constants::dialog::MAX_HEADER_SIZE;
use waiting_dialog::error::AppError;

const TERMINAL_TITLE: &str = "Waiting Dialog";

/// Validates command line argument combinations.
///
/// Returns an error if incompatible arguments are used together.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.new_log_file_path.is_some() && args.clear_log_file_path {
        return Err(AppError::config_error(
            "Cannot use both --set-log-file and --clear-log-file simultaneously",
        ));
    }
    if let Some(rank) = args.header_size
        && !(1..=MAX_HEADER_SIZE).contains(&rank)
    {
        return Err(AppError::config_error(format!(
            "Header size must be between 1 and {MAX_HEADER_SIZE}, got {rank}"
        )));
    }
    if args.steps == 0 {
        return Err(AppError::config_error("Step count must be at least 1"));
    }
    if args.timer_ms == Some(0) {
        return Err(AppError::config_error(
            "Animation cadence must be greater than zero",
        ));
    }
    Ok(())
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    execute!(stdout(), SetTitle(TERMINAL_TITLE))?;
    Config::display().await?;
    Ok(())
}

/// Handles configuration update commands (--set-log-file, --clear-log-file).
pub async fn handle_config_update_command(args: &Args, config: &Config) -> Result<(), AppError> {
    let mut config = config.clone();

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");
    tracing::info!("Config saved to {}", Config::get_config_path());

    Ok(())
}
