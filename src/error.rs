// Error type shared by all store facing operations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("{message}: {source}")]
    Sqlite {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{message}: {source}")]
    Seed {
        message: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Worker error: {0}")]
    Worker(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Builds a closure usable with `map_err` that wraps a rusqlite error
    /// together with a description of what was being attempted.
    pub fn sqlite(message: impl Into<String>) -> impl FnOnce(rusqlite::Error) -> Self {
        let message = message.into();
        move |source| Self::Sqlite { message, source }
    }
}

// Helper conversions
impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite { message: "Persistence error".to_string(), source: e }
    }
}
impl From<config::ConfigError> for StoreError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Self::Lock(e.to_string())
    }
}
