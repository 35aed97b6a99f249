use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use utoipa::IntoParams;

use crate::celestrak::LookupError;
use crate::ephemeris::{Observer, SatelliteSelection, TimeWindow, TleRecord};
use crate::geo::{resolve_zone, GeocodedLocation, LocalWindow, ObserverZone};

use super::config::Config;
use super::state::AppState;

pub const CUSTOM_SATELLITE: &str = "Custom Satellite";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Please fill in all fields ({0}).")]
    Incomplete(&'static str),
    #[error("{0}")]
    Invalid(String),
    #[error("TLE data could not be fetched for '{0}'. Please check the satellite name or NORAD ID.")]
    SatelliteNotFound(String),
    #[error("Error fetching TLE data: {0}")]
    Upstream(String),
}

/// Query string shared by the results page and the JSON API. Blank fields
/// count as missing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EphemerisForm {
    /// Configured constellation name, or "Custom Satellite"
    pub constellation: Option<String>,
    /// Satellite name or NORAD ID; read only when the constellation is blank
    /// or "Custom Satellite"
    pub satellite: Option<String>,
    /// Free-text address, geocoded when no coordinates are given
    pub address: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// IANA timezone of date/start/end; derived from the coordinates when blank
    pub tz: Option<String>,
    /// Local date, YYYY-MM-DD
    pub date: Option<String>,
    /// Local start time, HH:MM
    pub start: Option<String>,
    /// Local end time on the same date, HH:MM
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceChoice {
    Feed { name: String, url: String },
    Lookup(String),
}

/// Everything needed to run one computation.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub selection: SatelliteSelection,
    pub observer: Observer,
    pub location: Option<String>,
    pub zone: ObserverZone,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub window: TimeWindow,
    pub diagnostics: Vec<String>,
}

impl ResolvedRequest {
    pub fn custom_tle(&self) -> Option<&TleRecord> {
        self.selection.custom.as_ref()
    }
}

pub fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn select_source(config: &Config, form: &EphemerisForm) -> Result<SourceChoice, RequestError> {
    let name = match field(&form.constellation) {
        Some(name) if !name.eq_ignore_ascii_case(CUSTOM_SATELLITE) => name,
        _ => {
            return field(&form.satellite)
                .map(|query| SourceChoice::Lookup(query.to_string()))
                .ok_or(RequestError::Incomplete("satellite name or NORAD ID"))
        }
    };

    config
        .find_constellation(name)
        .map(|c| SourceChoice::Feed {
            name: c.name.clone(),
            url: c.url.clone(),
        })
        .ok_or_else(|| RequestError::Invalid(format!("Unknown constellation '{}'", name)))
}

/// Coordinates typed or clicked into the form, if both are present.
pub fn manual_observer(form: &EphemerisForm) -> Result<Option<Observer>, RequestError> {
    let (Some(lat), Some(lon)) = (field(&form.lat), field(&form.lon)) else {
        return Ok(None);
    };
    let parse = |label: &str, value: &str| {
        value
            .parse::<f64>()
            .map_err(|_| RequestError::Invalid(format!("Invalid {} '{}'", label, value)))
    };
    Observer::new(parse("latitude", lat)?, parse("longitude", lon)?)
        .map(Some)
        .map_err(|e| RequestError::Invalid(e.to_string()))
}

pub fn local_window(form: &EphemerisForm) -> Result<LocalWindow, RequestError> {
    match (field(&form.date), field(&form.start), field(&form.end)) {
        (Some(date), Some(start), Some(end)) => {
            LocalWindow::parse(date, start, end).map_err(|e| RequestError::Invalid(e.to_string()))
        }
        _ => Err(RequestError::Incomplete("date, start and end time")),
    }
}

/// Observer at a geocoded place; an unusable result leaves a diagnostic.
pub fn geocoded_observer(
    address: &str,
    place: &GeocodedLocation,
    diagnostics: &mut Vec<String>,
) -> Option<Observer> {
    match Observer::new(place.latitude, place.longitude) {
        Ok(observer) => Some(observer),
        Err(e) => {
            log::warn!("Geocoder returned an unusable location for '{}': {}", address, e);
            diagnostics.push(format!("Invalid location for '{}': {}", address, e));
            None
        }
    }
}

/// Turn a submitted form into a computation request: look up a custom
/// satellite, geocode the address when no coordinates were given, resolve the
/// timezone and convert the local window to UTC.
pub async fn resolve(state: &AppState, form: &EphemerisForm) -> Result<ResolvedRequest, RequestError> {
    let mut diagnostics = Vec::new();

    let selection = match select_source(&state.config, form)? {
        SourceChoice::Feed { url, .. } => SatelliteSelection::feed(url),
        SourceChoice::Lookup(query) => match state.celestrak.lookup_satellite(&query).await {
            Ok(record) => SatelliteSelection::custom(record),
            Err(LookupError::NotFound(q)) => return Err(RequestError::SatelliteNotFound(q)),
            Err(LookupError::EmptyQuery) => {
                return Err(RequestError::Incomplete("satellite name or NORAD ID"))
            }
            Err(e) => {
                log::error!("TLE lookup for '{}' failed: {}", query, e);
                return Err(RequestError::Upstream(e.to_string()));
            }
        },
    };

    let mut location = None;
    let mut observer = manual_observer(form)?;
    if observer.is_none() {
        if let Some(address) = field(&form.address) {
            match state.geocoder.geocode(address).await {
                Ok(Some(place)) => {
                    observer = geocoded_observer(address, &place, &mut diagnostics);
                    location = Some(place.display_name);
                }
                Ok(None) => diagnostics
                    .push("Could not find the location. Please enter a valid address.".to_string()),
                Err(e) => {
                    log::warn!("Geocoding '{}' failed: {}", address, e);
                    diagnostics.push(format!("Error fetching location data: {}", e));
                }
            }
        }
    }
    let observer = match observer {
        Some(observer) => observer,
        None if !diagnostics.is_empty() => {
            return Err(RequestError::Invalid(diagnostics.join(" ")))
        }
        None => return Err(RequestError::Incomplete("latitude and longitude")),
    };

    let window = local_window(form)?;
    let zone = resolve_zone(
        field(&form.tz),
        Some((observer.latitude_deg, observer.longitude_deg)),
        &mut diagnostics,
    );
    let (start_utc, end_utc) = window
        .to_utc(&zone)
        .map_err(|e| RequestError::Invalid(e.to_string()))?;

    Ok(ResolvedRequest {
        selection,
        observer,
        location,
        zone,
        start_utc,
        end_utc,
        window: TimeWindow::between(start_utc, end_utc),
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EphemerisForm {
        EphemerisForm {
            constellation: Some("OneWeb".to_string()),
            lat: Some("37.7749".to_string()),
            lon: Some(" -122.4194 ".to_string()),
            date: Some("2024-07-04".to_string()),
            start: Some("21:00".to_string()),
            end: Some("21:30".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn blank_fields_are_missing() {
        assert_eq!(field(&Some("  ".to_string())), None);
        assert_eq!(field(&None), None);
        assert_eq!(field(&Some(" x ".to_string())), Some("x"));
    }

    #[test]
    fn constellation_selects_feed() {
        let choice = select_source(&Config::default(), &form()).unwrap();
        assert!(matches!(choice, SourceChoice::Feed { ref name, .. } if name == "OneWeb"));
    }

    #[test]
    fn satellite_field_ignored_for_constellation() {
        let mut f = form();
        f.satellite = Some("25544".to_string());
        let choice = select_source(&Config::default(), &f).unwrap();
        assert!(matches!(choice, SourceChoice::Feed { ref name, .. } if name == "OneWeb"));
    }

    #[test]
    fn custom_option_looks_up_satellite() {
        let mut f = form();
        f.constellation = Some(CUSTOM_SATELLITE.to_string());
        f.satellite = Some(" 25544 ".to_string());
        assert_eq!(
            select_source(&Config::default(), &f).unwrap(),
            SourceChoice::Lookup("25544".to_string())
        );

        f.constellation = None;
        assert_eq!(
            select_source(&Config::default(), &f).unwrap(),
            SourceChoice::Lookup("25544".to_string())
        );
    }

    #[test]
    fn custom_without_identifier_is_incomplete() {
        let mut f = form();
        f.constellation = Some(CUSTOM_SATELLITE.to_string());
        f.satellite = Some("".to_string());
        assert!(matches!(
            select_source(&Config::default(), &f),
            Err(RequestError::Incomplete(_))
        ));
    }

    #[test]
    fn unknown_constellation_is_invalid() {
        let mut f = form();
        f.constellation = Some("Iridium".to_string());
        assert!(matches!(
            select_source(&Config::default(), &f),
            Err(RequestError::Invalid(_))
        ));
    }

    #[test]
    fn manual_coordinates_are_parsed_and_checked() {
        let observer = manual_observer(&form()).unwrap().unwrap();
        assert_eq!(observer.longitude_deg, -122.4194);

        let mut f = form();
        f.lon = None;
        assert!(manual_observer(&f).unwrap().is_none());

        f.lon = Some("east".to_string());
        assert!(manual_observer(&f).is_err());

        f.lon = Some("10".to_string());
        f.lat = Some("-91".to_string());
        assert!(manual_observer(&f).is_err());
    }

    #[test]
    fn out_of_range_geocode_result_is_reported() {
        let place = GeocodedLocation {
            latitude: 123.0,
            longitude: 10.0,
            display_name: "Nowhere".to_string(),
        };
        let mut diagnostics = Vec::new();
        assert!(geocoded_observer("nowhere", &place, &mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("latitude 123"));

        let place = GeocodedLocation {
            latitude: 48.85,
            ..place
        };
        let mut diagnostics = Vec::new();
        let observer = geocoded_observer("paris", &place, &mut diagnostics).unwrap();
        assert_eq!(observer.latitude_deg, 48.85);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn window_requires_all_fields() {
        assert!(local_window(&form()).is_ok());
        let mut f = form();
        f.end = Some("".to_string());
        assert!(matches!(local_window(&f), Err(RequestError::Incomplete(_))));
        f.end = Some("9pm".to_string());
        assert!(matches!(local_window(&f), Err(RequestError::Invalid(_))));
    }
}
