use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Dialog state machine errors
    #[error("Progress total must be greater than zero")]
    DivisionByZero,

    #[error("Invalid dialog state: {0}")]
    InvalidState(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Render surface error: {0}")]
    Surface(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create an invalid state error with context
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create an invalid argument error with context
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a render surface error with context
    pub fn surface_error(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Whether the error is a caller contract violation rather than an
    /// environment failure (I/O, config files, logging).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::DivisionByZero | Self::InvalidState(_) | Self::InvalidArgument(_)
        )
    }
}
