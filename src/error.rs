use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConcordError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Malformed descriptor {descriptor}: {reason}")]
    MalformedDescriptor { descriptor: String, reason: String },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Generation cancelled")]
    Cancelled,
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, ConcordError>;

impl ConcordError {
    pub fn malformed(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }
}

// Helper conversions
impl From<rusqlite::Error> for ConcordError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}
impl From<serde_json::Error> for ConcordError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
impl From<config::ConfigError> for ConcordError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
