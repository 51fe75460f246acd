use thiserror::Error;

/// All errors generated in `quarterband-scanner`.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("http transport failed for {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("exchange returned status {status} for {path}")]
    Status { status: u16, path: String },

    #[error("malformed payload from {path}: {detail}")]
    Payload { path: String, detail: String },

    #[error("product universe unavailable: {0}")]
    Universe(String),
}

impl ScanError {
    /// Whether the failure only degrades a single snapshot field.
    ///
    /// Non-transient errors abandon the whole cycle; transient ones leave
    /// the affected field absent and let the cycle continue.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ScanError::Transport { .. } | ScanError::Status { .. } | ScanError::Payload { .. }
        )
    }
}

/// Configuration failures surfaced before the scanner starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {name} has unparseable value {value:?}")]
    Parse { name: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
