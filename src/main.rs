// src/main.rs
mod app;
mod cli;
mod commands;
mod logging;

use app::Outcome;
use clap::Parser;
use cli::Args;
use waiting_dialog::config::Config;
use waiting_dialog::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    commands::validate_args(&args)?;

    // Load config first to fail early if there's an issue
    let config = Config::load().await?;

    let (log_file_path, _guard) = logging::setup_logging(&args, &config).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    if args.list_config {
        return commands::handle_list_config_command().await;
    }

    if args.new_log_file_path.is_some() || args.clear_log_file_path {
        return commands::handle_config_update_command(&args, &config).await;
    }

    match app::run_demo(&args, &config).await? {
        Outcome::Completed => println!("Job finished."),
        Outcome::Dismissed => println!("Dialog dismissed, job cancelled."),
    }

    Ok(())
}
