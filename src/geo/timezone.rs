use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use thiserror::Error;
use tzf_rs::DefaultFinder;

lazy_static! {
    /// Timezone boundary polygons, loaded once.
    static ref FINDER: DefaultFinder = DefaultFinder::new();
}

#[derive(Debug, Error)]
pub enum TimezoneError {
    #[error("unknown timezone '{0}'")]
    Unknown(String),
    #[error("coordinates ({0}, {1}) out of range")]
    InvalidCoordinates(f64, f64),
    #[error("no timezone found for ({0}, {1})")]
    NotFound(f64, f64),
    #[error("local time {0} does not exist in {1}")]
    NonexistentLocalTime(NaiveDateTime, String),
    #[error("invalid time '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Timezone the observer's local date and times are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObserverZone {
    Named(Tz),
    /// The machine's own timezone.
    Local,
}

impl ObserverZone {
    pub fn parse(name: &str) -> Result<Self, TimezoneError> {
        name.trim()
            .parse::<Tz>()
            .map(ObserverZone::Named)
            .map_err(|_| TimezoneError::Unknown(name.to_string()))
    }

    /// IANA zone whose boundary contains the position.
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Result<Self, TimezoneError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(TimezoneError::InvalidCoordinates(latitude, longitude));
        }
        match FINDER.get_tz_name(longitude, latitude) {
            "" => Err(TimezoneError::NotFound(latitude, longitude)),
            name => Self::parse(name),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ObserverZone::Named(tz) => tz.name().to_string(),
            ObserverZone::Local => "local".to_string(),
        }
    }

    /// Abbreviation in effect at `at`, e.g. `PST`.
    pub fn abbreviation(&self, at: DateTime<Utc>) -> String {
        let abbr = match self {
            ObserverZone::Named(tz) => at.with_timezone(tz).format("%Z").to_string(),
            ObserverZone::Local => at.with_timezone(&Local).format("%Z").to_string(),
        };
        if abbr.is_empty() {
            self.name()
        } else {
            abbr
        }
    }

    /// Ambiguous local times resolve to the earlier instant.
    pub fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>, TimezoneError> {
        let utc = match self {
            ObserverZone::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            ObserverZone::Local => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        };
        utc.ok_or_else(|| TimezoneError::NonexistentLocalTime(local, self.name()))
    }
}

/// Pick the observer's zone: an explicit name first, then the coordinates,
/// then the local machine zone. Each fallback leaves a diagnostic.
pub fn resolve_zone(
    explicit: Option<&str>,
    coordinates: Option<(f64, f64)>,
    diagnostics: &mut Vec<String>,
) -> ObserverZone {
    if let Some(name) = explicit {
        match ObserverZone::parse(name) {
            Ok(zone) => return zone,
            Err(e) => {
                log::warn!("{}", e);
                diagnostics.push(format!("Error determining timezone: {}", e));
            }
        }
    }

    if let Some((lat, lon)) = coordinates {
        match ObserverZone::from_coordinates(lat, lon) {
            Ok(zone) => return zone,
            Err(e) => {
                log::warn!("{}", e);
                diagnostics.push(format!("Error determining timezone: {}", e));
            }
        }
    }

    ObserverZone::Local
}

/// Local calendar date with start and end time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl LocalWindow {
    pub fn parse(date: &str, start: &str, end: &str) -> Result<Self, TimezoneError> {
        Ok(Self {
            date: parse_date(date)?,
            start: parse_time_of_day(start)?,
            end: parse_time_of_day(end)?,
        })
    }

    pub fn to_utc(&self, zone: &ObserverZone) -> Result<(DateTime<Utc>, DateTime<Utc>), TimezoneError> {
        Ok((
            zone.to_utc(self.date.and_time(self.start))?,
            zone.to_utc(self.date.and_time(self.end))?,
        ))
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, TimezoneError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TimezoneError::InvalidDate(value.to_string()))
}

pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, TimezoneError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| TimezoneError::InvalidTime(value.to_string()))
}
