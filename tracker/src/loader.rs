use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::GeoPoint;

use crate::error::TrackerError;

/// On-disk representation of one fix in the route resource.
#[derive(Debug, Deserialize)]
struct RawPoint {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

/// Load a route file: a JSON array of `{latitude, longitude, timestamp}`
/// objects in chronological order.
pub fn route_from_file(path: impl AsRef<Path>) -> Result<Vec<GeoPoint>, TrackerError> {
    let file = File::open(path)?;
    route_from_reader(file)
}

pub fn route_from_reader(reader: impl Read) -> Result<Vec<GeoPoint>, TrackerError> {
    let raw: Vec<RawPoint> = serde_json::from_reader(reader)?;
    if raw.is_empty() {
        return Err(TrackerError::EmptyRoute);
    }
    Ok(raw
        .into_iter()
        .map(|p| GeoPoint {
            lat: p.latitude,
            lng: p.longitude,
            timestamp: p.timestamp,
        })
        .collect())
}
