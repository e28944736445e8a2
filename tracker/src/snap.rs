use serde::Deserialize;
use shared::GeoPoint;

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

/// Aligns raw GPS fixes to road geometry via an OSRM-compatible routing
/// service. Snapping is strictly best-effort: any failure falls back to the
/// raw points, so callers never see an error.
pub struct RoadSnapper {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// `[lng, lat]` pairs, GeoJSON axis order.
    coordinates: Vec<[f64; 2]>,
}

impl RoadSnapper {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OSRM_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Snap a route to the road network. Fewer than two points cannot form a
    /// driving route and are returned unchanged, as is the input on any
    /// transport, parse, or empty-response failure. Single attempt, no retry.
    pub async fn snap(&self, points: &[GeoPoint]) -> Vec<GeoPoint> {
        if points.len() < 2 {
            return points.to_vec();
        }

        match self.request(points).await {
            Ok(Some(snapped)) => {
                tracing::debug!(
                    raw = points.len(),
                    snapped = snapped.len(),
                    "route snapped to road geometry"
                );
                snapped
            }
            Ok(None) => {
                tracing::warn!("routing service returned no route, using raw path");
                points.to_vec()
            }
            Err(err) => {
                tracing::warn!(error = %err, "road snap failed, using raw path");
                points.to_vec()
            }
        }
    }

    async fn request(&self, points: &[GeoPoint]) -> Result<Option<Vec<GeoPoint>>, reqwest::Error> {
        let coords = points
            .iter()
            .map(|p| format!("{},{}", p.lng, p.lat))
            .collect::<Vec<_>>()
            .join(";");
        let url = format!(
            "{}/route/v1/driving/{coords}?overview=full&geometries=geojson",
            self.base_url
        );

        let body: OsrmResponse = self.client.get(&url).send().await?.json().await?;
        Ok(snapped_points(body))
    }
}

impl Default for RoadSnapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Remap the service's `[lng, lat]` coordinates into `GeoPoint`s. Snapped
/// points carry no timestamps. `None` when the response holds no route.
fn snapped_points(body: OsrmResponse) -> Option<Vec<GeoPoint>> {
    let route = body.routes.into_iter().next()?;
    if route.geometry.coordinates.is_empty() {
        return None;
    }
    Some(
        route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| GeoPoint::new(lat, lng))
            .collect(),
    )
}
