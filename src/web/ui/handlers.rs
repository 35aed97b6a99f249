use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Local;

use crate::ephemeris::{compute_ephemeris, TIMESTAMP_FORMAT};
use crate::web::request::{resolve, EphemerisForm, CUSTOM_SATELLITE};
use crate::web::state::AppState;

use super::templates::{IndexTemplate, ResultsTemplate};

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    IndexTemplate {
        constellations: state
            .config
            .constellations
            .iter()
            .map(|c| c.name.clone())
            .collect(),
        custom_option: CUSTOM_SATELLITE,
        default_latitude: state.config.default_location.latitude,
        default_longitude: state.config.default_location.longitude,
        today: Local::now().format("%Y-%m-%d").to_string(),
    }
}

pub async fn ephemeris(
    State(state): State<AppState>,
    Query(form): Query<EphemerisForm>,
) -> impl IntoResponse {
    let request = match resolve(&state, &form).await {
        Ok(request) => request,
        Err(e) => {
            log::info!("Rejected ephemeris form: {}", e);
            return ResultsTemplate {
                error: Some(e.to_string()),
                ..Default::default()
            };
        }
    };

    let table = compute_ephemeris(
        &state.celestrak,
        &request.selection,
        request.observer,
        request.window,
    )
    .await;

    let mut diagnostics = request.diagnostics.clone();
    diagnostics.extend(table.diagnostics.iter().cloned());

    ResultsTemplate {
        error: None,
        diagnostics,
        custom_tle: request.custom_tle().cloned(),
        location: request.location.clone(),
        latitude: format!("{:.4}", request.observer.latitude_deg),
        longitude: format!("{:.4}", request.observer.longitude_deg),
        timezone: request.zone.name(),
        timezone_abbreviation: request.zone.abbreviation(request.start_utc),
        start_utc: request.start_utc.format(TIMESTAMP_FORMAT).to_string(),
        end_utc: request.end_utc.format(TIMESTAMP_FORMAT).to_string(),
        rows: table.rows(),
    }
}
