use utoipa::OpenApi;

use super::api::ephemeris::EphemerisResponse;
use super::api::error::ErrorResponse;
use super::api::lookup::TimezoneResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::ephemeris::get_ephemeris,
        super::api::lookup::get_tle,
        super::api::lookup::geocode,
        super::api::lookup::timezone,
    ),
    components(
        schemas(
            EphemerisResponse,
            ErrorResponse,
            TimezoneResponse,
            crate::ephemeris::VisibilitySample,
            crate::ephemeris::EphemerisRow,
            crate::ephemeris::CardinalDirection,
            crate::ephemeris::Observer,
            crate::ephemeris::TimeWindow,
            crate::ephemeris::TleRecord,
            crate::geo::GeocodedLocation,
        )
    ),
    info(
        title = "Satellite Ephemeris API",
        description = "Visibility windows of satellites above an observer's horizon",
        version = "0.1.0"
    ),
    tags(
        (name = "ephemeris", description = "Visibility computation"),
        (name = "lookup", description = "TLE, address and timezone lookups")
    )
)]
pub struct ApiDoc;
