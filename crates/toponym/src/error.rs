use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToponymError {
    #[error("Geocoding dataset not loaded")]
    NotLoaded,
    #[error("Geocoding dataset missing or corrupt: {0}")]
    DatasetMissingOrCorrupt(#[from] toponym_data::DataError),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("No places found for '{query}'")]
    NoResults { query: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ToponymError>;
