use thiserror::Error;

use crate::celestrak::FetchError;

#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("Invalid observer: {0}")]
    InvalidObserver(String),
    #[error("Invalid TLE format in {source_name}: {message}")]
    InvalidTle {
        source_name: String,
        message: String,
    },
    #[error("No satellite or constellation selected")]
    NothingSelected,
    #[error("No satellites found in {0}")]
    EmptyFeed(String),
    #[error("Propagation error: {0}")]
    Propagation(String),
    #[error("Feed download failed: {0}")]
    Fetch(#[from] FetchError),
}

impl From<sgp4::Error> for EphemerisError {
    fn from(err: sgp4::Error) -> Self {
        EphemerisError::Propagation(err.to_string())
    }
}
