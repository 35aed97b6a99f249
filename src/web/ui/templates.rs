use askama::Template;
use askama_web::WebTemplate;

use crate::ephemeris::{EphemerisRow, TleRecord};

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub constellations: Vec<String>,
    pub custom_option: &'static str,
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub today: String,
}

#[derive(Template, WebTemplate, Default)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub error: Option<String>,
    pub diagnostics: Vec<String>,
    pub custom_tle: Option<TleRecord>,
    pub location: Option<String>,
    pub latitude: String,
    pub longitude: String,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub start_utc: String,
    pub end_utc: String,
    pub rows: Vec<EphemerisRow>,
}
