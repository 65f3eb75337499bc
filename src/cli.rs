use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use waiting_dialog::constants::demo;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Determines if the application should run without drawing the dialog.
/// This is the case for config operations, where output goes to stdout.
pub fn is_noninteractive_mode(args: &Args) -> bool {
    args.new_log_file_path.is_some() || args.clear_log_file_path || args.list_config
}

/// Waiting dialog demo
///
/// Runs a simulated long-running job behind a modal waiting dialog with a
/// progress bar and an optional animated header.
///
/// While the dialog is open:
/// - Press Esc or 'q' to dismiss it and cancel the job
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
#[command(styles = get_styles())]
pub struct Args {
    /// Message shown while the job runs
    #[arg(short, long, default_value = "Loading")]
    pub message: String,

    /// Header text. When set, the message moves below the header.
    #[arg(long = "header-text", help_heading = "Dialog Options")]
    pub header_text: Option<String>,

    /// Hide the header; the message becomes the only content
    #[arg(
        long = "no-header",
        help_heading = "Dialog Options",
        conflicts_with = "header_text"
    )]
    pub no_header: bool,

    /// Header rank from 1 (most prominent) to 6
    #[arg(long = "header-size", help_heading = "Dialog Options")]
    pub header_size: Option<u8>,

    /// Dialog size: sm, m or lg
    #[arg(long = "dialog-size", help_heading = "Dialog Options")]
    pub dialog_size: Option<String>,

    /// Progress bar flavour: success, info, warning or danger
    #[arg(long = "progress-type", help_heading = "Dialog Options")]
    pub progress_type: Option<String>,

    /// Fill the progress bar left-to-right
    #[arg(long = "ltr", help_heading = "Dialog Options")]
    pub ltr: bool,

    /// Number of simulated work steps
    #[arg(long, default_value_t = demo::STEPS, help_heading = "Job Options")]
    pub steps: u64,

    /// Average duration of a work step in milliseconds
    #[arg(long = "step-ms", default_value_t = demo::STEP_MS, help_heading = "Job Options")]
    pub step_ms: u64,

    /// Cycle the header with a growing ellipsis while the job runs
    #[arg(short, long, help_heading = "Job Options")]
    pub animate: bool,

    /// Animation cadence in milliseconds (default: from config)
    #[arg(long = "timer-ms", help_heading = "Job Options")]
    pub timer_ms: Option<u64>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug mode which doesn't enter the alternate screen.
    /// Logs are written to the log file.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["waiting_dialog"]);
        assert_eq!(args.message, "Loading");
        assert_eq!(args.steps, demo::STEPS);
        assert!(!args.animate);
        assert!(!is_noninteractive_mode(&args));
    }

    #[test]
    fn test_config_operations_are_noninteractive() {
        let args = Args::parse_from(["waiting_dialog", "--list-config"]);
        assert!(is_noninteractive_mode(&args));
        let args = Args::parse_from(["waiting_dialog", "--set-log-file", "/tmp/x.log"]);
        assert!(is_noninteractive_mode(&args));
    }

    #[test]
    fn test_header_flags_conflict() {
        let result = Args::try_parse_from([
            "waiting_dialog",
            "--no-header",
            "--header-text",
            "Title",
        ]);
        assert!(result.is_err());
    }
}
