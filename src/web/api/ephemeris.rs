use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::ephemeris::{
    compute_ephemeris, EphemerisRow, Observer, TimeWindow, TleRecord, VisibilitySample,
};
use crate::web::api::error::ApiResult;
use crate::web::request::{resolve, EphemerisForm};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct EphemerisResponse {
    pub observer: Observer,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub window: TimeWindow,
    pub custom_tle: Option<TleRecord>,
    pub samples: Vec<VisibilitySample>,
    pub rows: Vec<EphemerisRow>,
    pub diagnostics: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/ephemeris",
    tag = "ephemeris",
    params(EphemerisForm),
    responses(
        (status = 200, description = "Visibility samples, possibly empty", body = EphemerisResponse),
        (status = 400, description = "Missing or invalid fields", body = crate::web::api::error::ErrorResponse),
        (status = 404, description = "Custom satellite not found", body = crate::web::api::error::ErrorResponse),
        (status = 502, description = "TLE lookup failed", body = crate::web::api::error::ErrorResponse)
    )
)]
pub async fn get_ephemeris(
    State(state): State<AppState>,
    Query(form): Query<EphemerisForm>,
) -> ApiResult<Json<EphemerisResponse>> {
    let request = resolve(&state, &form).await?;

    let table = compute_ephemeris(
        &state.celestrak,
        &request.selection,
        request.observer,
        request.window,
    )
    .await;

    let mut diagnostics = request.diagnostics.clone();
    diagnostics.extend(table.diagnostics.iter().cloned());

    Ok(Json(EphemerisResponse {
        observer: request.observer,
        timezone: request.zone.name(),
        timezone_abbreviation: request.zone.abbreviation(request.start_utc),
        start_utc: request.start_utc,
        end_utc: request.end_utc,
        window: request.window,
        custom_tle: request.custom_tle().cloned(),
        rows: table.rows(),
        samples: table.samples,
        diagnostics,
    }))
}
