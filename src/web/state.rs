use std::sync::Arc;

use thiserror::Error;

use crate::celestrak::{CelestrakClient, FetchError};
use crate::geo::{GeocodeError, Geocoder};

use super::config::Config;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("CelesTrak client: {0}")]
    Celestrak(#[from] FetchError),
    #[error("geocoder client: {0}")]
    Geocoder(#[from] GeocodeError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub celestrak: CelestrakClient,
    pub geocoder: Geocoder,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, StateError> {
        let celestrak = CelestrakClient::new(&config.celestrak.gp_url, config.celestrak.timeout)?;
        let geocoder = Geocoder::new(
            &config.geocoder.url,
            &config.geocoder.user_agent,
            config.geocoder.timeout,
        )?;
        Ok(Self {
            config: Arc::new(config),
            celestrak,
            geocoder,
        })
    }
}
