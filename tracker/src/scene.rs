use shared::{MapScene, MarkerView};

use crate::animator::MarkerAnimator;
use crate::playback::{Mode, PlaybackController};

/// Raster tile layer requested per visible tile by the map canvas.
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Compose one frame of the map: the always-visible base polyline, the
/// history overlay while scrubbing, and the single animated marker. `None`
/// until a route is loaded, which renderers show as a loading placeholder.
pub fn compose(controller: &PlaybackController, animator: &MarkerAnimator) -> Option<MapScene> {
    let base_route = controller.snapped_route();
    if base_route.is_empty() {
        return None;
    }

    let history_overlay = match controller.mode() {
        Mode::History => Some(controller.window().to_vec()),
        Mode::Live => None,
    };

    Some(MapScene {
        tile_url: TILE_URL.to_string(),
        center: animator.position(),
        base_route: base_route.to_vec(),
        history_overlay,
        marker: MarkerView {
            position: animator.position(),
            bearing_deg: animator.bearing_deg(),
            icon: animator.icon(),
        },
    })
}
