//! Application-wide constants and default values
//!
//! This module centralizes the dialog defaults and the magic numbers used by
//! the terminal surface so they can be tuned in one place.

/// Message shown when `show` is called without one
pub const DEFAULT_MESSAGE: &str = "Loading";

/// Log file name used when no custom path is configured
pub const LOG_FILE_NAME: &str = "waiting_dialog.log";

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "waiting_dialog";

/// Session defaults applied before caller options are merged
pub mod dialog {
    /// Heading rank used for the header region
    pub const HEADER_SIZE: u8 = 3;

    /// Highest heading rank accepted
    pub const MAX_HEADER_SIZE: u8 = 6;

    /// Dialog size postfix
    pub const DIALOG_SIZE: &str = "m";

    /// Element name used for the body content
    pub const CONTENT_ELEMENT: &str = "p";

    /// Class applied to the body content
    pub const CONTENT_CLASS: &str = "content";

    /// Progress bar fills right-to-left unless disabled
    pub const RTL: bool = true;

    /// Default cadence of message-cycling jobs in milliseconds
    pub const TIMER_MS: u64 = 500;

    /// Default delay before the first cycling tick in milliseconds
    pub const TIMEOUT_MS: u64 = 0;

    /// Suffix appended to the progress percentage in the bar label
    pub const PROGRESS_LABEL_SUFFIX: &str = "Complete";

    /// Suffixes used to expand a single message into a cycling sequence
    pub const ELLIPSIS_FRAMES: [&str; 3] = ["..", "....", "......"];
}

/// Terminal surface layout
pub mod surface {
    /// Inner width of a small dialog
    pub const WIDTH_SMALL: usize = 36;

    /// Inner width of a medium dialog
    pub const WIDTH_MEDIUM: usize = 52;

    /// Inner width of a large dialog
    pub const WIDTH_LARGE: usize = 72;

    /// Terminal size assumed when it cannot be queried
    pub const FALLBACK_COLUMNS: u16 = 80;
    pub const FALLBACK_ROWS: u16 = 24;

    /// Footer hint shown under the body
    pub const CLOSE_HINT: &str = "Esc = Close";
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "WAITING_DIALOG_LOG_FILE";

    /// Environment variable for the default animation cadence in milliseconds
    pub const TIMER_MS: &str = "WAITING_DIALOG_TIMER_MS";

    /// Environment variable for the default animation delay in milliseconds
    pub const TIMEOUT_MS: &str = "WAITING_DIALOG_TIMEOUT_MS";
}

/// Demo job tuning
pub mod demo {
    /// Number of work steps simulated by default
    pub const STEPS: u64 = 20;

    /// Average duration of a simulated work step in milliseconds
    pub const STEP_MS: u64 = 250;

    /// Jitter applied to each step (+/- fraction of STEP_MS)
    pub const JITTER_FRACTION: f64 = 0.4;

    /// Key event polling interval in milliseconds
    pub const POLL_MS: u64 = 50;
}
