mod calculator;
pub mod catalog;
mod direction;
mod error;
pub mod frames;
mod observer;
pub mod propagation;
mod types;
mod window;

pub use calculator::compute_ephemeris;
pub use catalog::{Satellite, SatelliteSelection, TleRecord};
pub use direction::CardinalDirection;
pub use error::EphemerisError;
pub use observer::Observer;
pub use types::{EphemerisRow, EphemerisTable, VisibilitySample, TIMESTAMP_FORMAT};
pub use window::TimeWindow;
