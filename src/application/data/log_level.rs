use clap::ValueEnum;
use tracing::Level;

/// Verbosity of diagnostic output on stderr. Transfer output and the final
/// summary are printed regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    /// `None` means no subscriber is installed at all.
    pub fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}
