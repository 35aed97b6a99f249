pub mod ephemeris;
pub mod error;
pub mod lookup;
