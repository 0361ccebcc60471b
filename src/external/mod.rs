//! External service clients.

pub mod geocoding;

pub use geocoding::{Geocoder, Location, NominatimGeocoder};
