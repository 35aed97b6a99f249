mod client;
mod error;

pub use client::{CelestrakClient, TleFetcher};
pub use error::{FetchError, LookupError};
