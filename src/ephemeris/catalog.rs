use serde::{Deserialize, Serialize};
use sgp4::{Constants, Elements};
use utoipa::ToSchema;

use crate::ephemeris::EphemerisError;

/// Raw TLE text for a single satellite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TleRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

/// A satellite ready for propagation.
pub struct Satellite {
    pub name: String,
    pub norad_id: u32,
    pub elements: Elements,
    pub constants: Constants,
}

impl Satellite {
    pub fn from_record(record: &TleRecord, source_name: &str) -> Result<Self, EphemerisError> {
        let name = Some(record.name.clone()).filter(|n| !n.is_empty());
        Self::from_lines(name, &record.line1, &record.line2, source_name)
    }

    fn from_lines(
        name: Option<String>,
        line1: &str,
        line2: &str,
        source_name: &str,
    ) -> Result<Self, EphemerisError> {
        let invalid = |message: String| EphemerisError::InvalidTle {
            source_name: source_name.to_string(),
            message,
        };

        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
            .map_err(|e| invalid(e.to_string()))?;
        let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        let name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
        Ok(Self {
            name,
            norad_id: elements.norad_id as u32,
            elements,
            constants,
        })
    }
}

/// Which satellites a computation covers.
#[derive(Debug, Clone, Default)]
pub struct SatelliteSelection {
    pub feed_url: Option<String>,
    pub custom: Option<TleRecord>,
}

impl SatelliteSelection {
    pub fn feed(url: impl Into<String>) -> Self {
        Self {
            feed_url: Some(url.into()),
            custom: None,
        }
    }

    pub fn custom(record: TleRecord) -> Self {
        Self {
            feed_url: None,
            custom: Some(record),
        }
    }

    pub fn describe(&self) -> String {
        match (&self.custom, &self.feed_url) {
            (Some(record), _) => record.name.clone(),
            (None, Some(url)) => url.clone(),
            (None, None) => "nothing".to_string(),
        }
    }
}

/// Parse every satellite in a bulk feed. Entries the propagator rejects are
/// skipped; a feed with nothing usable is an error.
pub fn parse_feed(content: &str, source_name: &str) -> Result<Vec<Satellite>, EphemerisError> {
    let mut satellites = Vec::new();

    for (name, line1, line2) in parse_multi_tle(content) {
        match Satellite::from_lines(name, &line1, &line2, source_name) {
            Ok(satellite) => satellites.push(satellite),
            Err(e) => log::warn!("Skipping feed entry: {}", e),
        }
    }

    if satellites.is_empty() {
        return Err(EphemerisError::EmptyFeed(source_name.to_string()));
    }
    Ok(satellites)
}

/// Split TLE text into `(name, line1, line2)` triples. Accepts both 2-line and
/// 3-line sets and skips anything else.
pub fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if is_line1(lines[i]) && i + 1 < lines.len() && is_line2(lines[i + 1]) {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len() && is_line1(lines[i + 1]) && is_line2(lines[i + 2]) {
            result.push((
                Some(strip_name_marker(lines[i]).to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}

pub fn is_line1(line: &str) -> bool {
    line.starts_with("1 ")
}

pub fn is_line2(line: &str) -> bool {
    line.starts_with("2 ")
}

// Some sources prefix the title line with "0 ".
fn strip_name_marker(line: &str) -> &str {
    line.strip_prefix("0 ").unwrap_or(line).trim()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const ISS_NAME: &str = "ISS (ZARYA)";
    pub const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    pub const ISS_LINE2: &str =
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    pub fn iss_record() -> TleRecord {
        TleRecord {
            name: ISS_NAME.to_string(),
            line1: ISS_LINE1.to_string(),
            line2: ISS_LINE2.to_string(),
        }
    }

    #[test]
    fn splits_two_and_three_line_sets() {
        let content = format!(
            "{ISS_NAME}\n{ISS_LINE1}\n{ISS_LINE2}\n\n{ISS_LINE1}\r\n{ISS_LINE2}\ngarbage\n"
        );
        let entries = parse_multi_tle(&content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0.as_deref(), Some(ISS_NAME));
        assert_eq!(entries[1].0, None);
        assert_eq!(entries[1].2, ISS_LINE2);
    }

    #[test]
    fn strips_zero_title_prefix() {
        let content = format!("0 {ISS_NAME}\n{ISS_LINE1}\n{ISS_LINE2}\n");
        assert_eq!(parse_multi_tle(&content)[0].0.as_deref(), Some(ISS_NAME));
    }

    #[test]
    fn parses_feed_satellites() {
        let content = format!("{ISS_NAME}\n{ISS_LINE1}\n{ISS_LINE2}\n{ISS_LINE1}\n{ISS_LINE2}\n");
        let satellites = parse_feed(&content, "test").unwrap();
        assert_eq!(satellites.len(), 2);
        assert_eq!(satellites[0].name, ISS_NAME);
        assert_eq!(satellites[0].norad_id, 25544);
        assert_eq!(satellites[1].name, "NORAD 25544");
    }

    #[test]
    fn rejects_feed_without_satellites() {
        let err = parse_feed("<html>Service Unavailable</html>", "test").err();
        assert!(matches!(err, Some(EphemerisError::EmptyFeed(_))));
    }

    #[test]
    fn rejects_corrupt_record() {
        let mut record = iss_record();
        record.line2 = "2 25544  garbage".to_string();
        assert!(matches!(
            Satellite::from_record(&record, "custom"),
            Err(EphemerisError::InvalidTle { .. })
        ));
    }
}
