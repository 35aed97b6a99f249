use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder returned status {0}")]
    Status(u16),
    #[error("unexpected geocoder response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Free-text address lookup against a Nominatim search endpoint.
#[derive(Clone)]
pub struct Geocoder {
    http: Client,
    url: String,
}

impl Geocoder {
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
        log::info!("Geocoding '{}'", address);
        let response = self
            .http
            .get(&self.url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }
        parse_search_response(&response.text().await?)
    }
}

pub fn parse_search_response(body: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse(e.to_string()))?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };
    let coordinate = |v: &str| {
        v.parse::<f64>()
            .map_err(|e| GeocodeError::Parse(format!("{}: {}", v, e)))
    };
    Ok(Some(GeocodedLocation {
        latitude: coordinate(&place.lat)?,
        longitude: coordinate(&place.lon)?,
        display_name: place.display_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_place() {
        let body = r#"[
            {"place_id": 1, "lat": "37.7792588", "lon": "-122.4193286", "display_name": "San Francisco, California"},
            {"place_id": 2, "lat": "0", "lon": "0", "display_name": "elsewhere"}
        ]"#;
        let location = parse_search_response(body).unwrap().unwrap();
        assert_eq!(location.latitude, 37.7792588);
        assert_eq!(location.longitude, -122.4193286);
        assert_eq!(location.display_name, "San Francisco, California");
    }

    #[test]
    fn empty_result_is_not_found() {
        assert_eq!(parse_search_response("[]").unwrap(), None);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(
            parse_search_response("<html>"),
            Err(GeocodeError::Parse(_))
        ));
        assert!(matches!(
            parse_search_response(r#"[{"lat": "north", "lon": "1"}]"#),
            Err(GeocodeError::Parse(_))
        ));
    }
}
