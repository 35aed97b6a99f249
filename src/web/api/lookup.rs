use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ephemeris::TleRecord;
use crate::geo::{resolve_zone, GeocodedLocation};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/tle/{query}",
    tag = "lookup",
    params(("query" = String, Path, description = "Satellite name or NORAD catalog number")),
    responses(
        (status = 200, description = "Current TLE", body = TleRecord),
        (status = 404, description = "No TLE data for this satellite", body = ErrorResponse),
        (status = 502, description = "CelesTrak unreachable", body = ErrorResponse)
    )
)]
pub async fn get_tle(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> ApiResult<Json<TleRecord>> {
    let record = state.celestrak.lookup_satellite(&query).await?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub address: String,
}

#[utoipa::path(
    get,
    path = "/api/geocode",
    tag = "lookup",
    params(("address" = String, Query, description = "Free-text address")),
    responses(
        (status = 200, description = "Location of the address", body = GeocodedLocation),
        (status = 404, description = "Address not found", body = ErrorResponse),
        (status = 502, description = "Geocoder unreachable", body = ErrorResponse)
    )
)]
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> ApiResult<Json<GeocodedLocation>> {
    let address = query.address.trim();
    if address.is_empty() {
        return Err(ApiError::Validation("empty address".into()));
    }

    match state.geocoder.geocode(address).await {
        Ok(Some(location)) => Ok(Json(location)),
        Ok(None) => Err(ApiError::NotFound(
            "location_not_found",
            format!("Could not find '{}'", address),
        )),
        Err(e) => {
            log::warn!("Geocoding '{}' failed: {}", address, e);
            Err(ApiError::Upstream(e.to_string()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TimezoneQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimezoneResponse {
    pub name: String,
    pub abbreviation: String,
    pub diagnostics: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/timezone",
    tag = "lookup",
    params(
        ("lat" = f64, Query, description = "Latitude (degrees)"),
        ("lon" = f64, Query, description = "Longitude (degrees)")
    ),
    responses(
        (status = 200, description = "Timezone for the coordinates, or the server zone", body = TimezoneResponse)
    )
)]
pub async fn timezone(Query(query): Query<TimezoneQuery>) -> Json<TimezoneResponse> {
    let mut diagnostics = Vec::new();
    let zone = resolve_zone(None, Some((query.lat, query.lon)), &mut diagnostics);
    Json(TimezoneResponse {
        name: zone.name(),
        abbreviation: zone.abbreviation(Utc::now()),
        diagnostics,
    })
}
