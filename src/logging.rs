use crate::cli::Args;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use waiting_dialog::config::Config;
use waiting_dialog::constants::LOG_FILE_NAME;
use waiting_dialog::error::AppError;

const DEFAULT_DIRECTIVE: &str = "waiting_dialog=info";

fn env_filter() -> Result<EnvFilter, AppError> {
    let directive = DEFAULT_DIRECTIVE
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Splits a custom log path into directory and file name.
fn split_log_path(custom_path: Option<&String>) -> (String, String) {
    match custom_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(LOG_FILE_NAME);
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (Config::get_log_dir_path(), LOG_FILE_NAME.to_string()),
    }
}

/// File layer always, stdout layer only when `to_stdout` is set.
///
/// While the dialog owns the screen nothing may be written to stdout.
fn subscriber<W>(
    file_writer: W,
    to_stdout: bool,
) -> Result<impl Subscriber + Send + Sync + 'static, AppError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let stdout_layer = if to_stdout {
        Some(
            fmt::Layer::new()
                .with_writer(stdout)
                .with_ansi(true)
                .with_filter(env_filter()?),
        )
    } else {
        None
    };
    let file_layer = fmt::Layer::new()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_filter(env_filter()?);

    Ok(tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer))
}

/// Sets up logging configuration for the application.
///
/// - While the dialog is drawn: logs only to file
/// - Config operations: logs to both stdout and file
/// - Creates log directory if it doesn't exist
/// - Uses daily rolling file appender
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(
    args: &Args,
    config: &Config,
) -> Result<(String, WorkerGuard), AppError> {
    let custom_log_path = args.log_file.as_ref().or(config.log_file_path.as_ref());
    let (log_dir, log_file_name) = split_log_path(custom_log_path);

    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    subscriber(non_blocking, crate::cli::is_noninteractive_mode(args))?
        .try_init()
        .map_err(|e| AppError::log_setup_error(e.to_string()))?;

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_split_custom_log_path() {
        let path = "/var/log/dialog/custom.log".to_string();
        let (dir, file) = split_log_path(Some(&path));
        assert_eq!(dir, "/var/log/dialog");
        assert_eq!(file, "custom.log");
    }

    #[test]
    fn test_split_bare_file_name_uses_current_dir() {
        let path = "custom.log".to_string();
        let (dir, file) = split_log_path(Some(&path));
        assert_eq!(dir, ".");
        assert_eq!(file, "custom.log");
    }

    #[test]
    fn test_split_default_log_path() {
        let (dir, file) = split_log_path(None);
        assert!(dir.ends_with("logs"));
        assert_eq!(file, LOG_FILE_NAME);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_text(captured: &Captured) -> String {
        String::from_utf8_lossy(&captured.0.lock().unwrap()).to_string()
    }

    #[test]
    fn test_file_only_subscriber_writes_events() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = subscriber(move || writer.clone(), false).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "waiting_dialog", "dialog shown");
        });
        assert!(captured_text(&captured).contains("dialog shown"));
    }

    #[test]
    fn test_subscriber_with_stdout_still_writes_file() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = subscriber(move || writer.clone(), true).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "waiting_dialog", "config updated");
        });
        let text = captured_text(&captured);
        assert!(text.contains("config updated"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_default_directive_parses() {
        assert!(env_filter().is_ok());
    }
}
