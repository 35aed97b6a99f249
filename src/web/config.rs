use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub celestrak: CelestrakConfig,
    pub geocoder: GeocoderConfig,
    pub constellations: Vec<Constellation>,
    pub default_location: DefaultLocation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CelestrakConfig {
    pub gp_url: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for CelestrakConfig {
    fn default() -> Self {
        Self {
            gp_url: "https://celestrak.org/NORAD/elements/gp.php".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub url: String,
    pub user_agent: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: "satellite-observation-app".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// A named bulk TLE feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Constellation {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DefaultLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for DefaultLocation {
    fn default() -> Self {
        Self {
            latitude: 37.7749,
            longitude: -122.4194,
        }
    }
}

const SUPPLEMENTAL_GP: &str = "https://celestrak.org/NORAD/elements/supplemental/sup-gp.php";

impl Default for Config {
    fn default() -> Self {
        let feed = |name: &str, query: &str| Constellation {
            name: name.to_string(),
            url: format!("{}?{}", SUPPLEMENTAL_GP, query),
        };
        Self {
            web: WebConfig::default(),
            celestrak: CelestrakConfig::default(),
            geocoder: GeocoderConfig::default(),
            constellations: vec![
                feed("Starlink Generation 1", "FILE=starlink&FORMAT=tle"),
                feed("Starlink Generation 2", "FILE=starlink&FORMAT=tle&VERSION=2"),
                feed("OneWeb", "FILE=oneweb&FORMAT=tle"),
                feed("Kuiper", "FILE=kuiper&FORMAT=tle"),
            ],
            default_location: DefaultLocation::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn find_constellation(&self, name: &str) -> Option<&Constellation> {
        let name = name.trim();
        self.constellations
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_standard_feeds() {
        let config = Config::default();
        assert_eq!(config.constellations.len(), 4);
        let oneweb = config.find_constellation("oneweb").unwrap();
        assert!(oneweb.url.ends_with("sup-gp.php?FILE=oneweb&FORMAT=tle"));
        assert!(config.find_constellation("Iridium").is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_str(
            "web:\n  bind: 127.0.0.1:3000\ncelestrak:\n  timeout: 2s 500ms\n",
        )
        .unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:3000");
        assert_eq!(config.celestrak.timeout, Duration::from_millis(2500));
        assert!(config.celestrak.gp_url.contains("gp.php"));
        assert_eq!(config.geocoder.timeout, Duration::from_secs(10));
        assert_eq!(config.constellations.len(), 4);
    }

    #[test]
    fn constellations_can_be_replaced() {
        let config = Config::from_str(
            "constellations:\n  - name: Stations\n    url: https://example.org/stations.txt\n",
        )
        .unwrap();
        assert_eq!(config.constellations.len(), 1);
        assert_eq!(config.find_constellation("stations").unwrap().name, "Stations");
    }

    #[test]
    fn bad_duration_is_rejected() {
        assert!(Config::from_str("geocoder:\n  timeout: soon\n").is_err());
    }
}
