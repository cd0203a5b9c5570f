use std::fmt;

/// Fatal startup problem: a required path or credential is missing or invalid.
/// Surfaced before any subprocess or network work is attempted.
#[derive(Debug, Clone)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}
