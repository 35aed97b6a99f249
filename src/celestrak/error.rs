use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("empty satellite name or NORAD ID")]
    EmptyQuery,
    #[error("no TLE data found for '{0}'")]
    NotFound(String),
    #[error("TLE lookup failed: {0}")]
    Fetch(#[from] FetchError),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Fetch(FetchError::Http(err))
    }
}
