use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

/// Eight-point compass label for an azimuth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

const SECTORS: [CardinalDirection; 8] = [
    CardinalDirection::N,
    CardinalDirection::NE,
    CardinalDirection::E,
    CardinalDirection::SE,
    CardinalDirection::S,
    CardinalDirection::SW,
    CardinalDirection::W,
    CardinalDirection::NW,
];

impl CardinalDirection {
    /// 45° sectors centred on each label, so N covers [337.5, 22.5).
    pub fn from_azimuth(azimuth_deg: f64) -> Self {
        let index = ((azimuth_deg + 22.5) / 45.0).floor() as i64;
        SECTORS[index.rem_euclid(8) as usize]
    }
}
