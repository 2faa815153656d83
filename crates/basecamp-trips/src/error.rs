use std::path::PathBuf;

use basecamp_core::{AppError, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripError {
    #[error("Failed to read trip catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Trip catalog is malformed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Trip id {0:?} appears more than once in the catalog")]
    DuplicateId(String),

    #[error("No trip with id {0:?}")]
    UnknownTrip(String),

    #[error("Invalid booking link: {0}")]
    Link(#[from] url::ParseError),
}

impl From<TripError> for AppError {
    fn from(e: TripError) -> Self {
        match e {
            TripError::Io { source, .. } => AppError::Io(source),
            TripError::Parse(e) => AppError::Config(ConfigError::ParseError(e.to_string())),
            TripError::DuplicateId(id) => {
                AppError::Config(ConfigError::Invalid(format!("duplicate trip id {}", id)))
            }
            other => AppError::Service(other.to_string()),
        }
    }
}
