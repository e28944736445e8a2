use std::time::{Duration, Instant};

use shared::{GeoPoint, MarkerIcon};

/// How long the marker glides between two route points.
pub const SEGMENT_DURATION: Duration = Duration::from_millis(1800);

/// How long after arrival the marker keeps its moving icon.
pub const IDLE_DELAY: Duration = Duration::from_millis(500);

/// One in-flight glide. At most one exists per marker; a new target
/// replaces it wholesale.
#[derive(Debug, Clone, Copy)]
struct AnimationSegment {
    start: GeoPoint,
    end: GeoPoint,
    started_at: Instant,
}

impl AnimationSegment {
    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / SEGMENT_DURATION.as_secs_f64()).min(1.0)
    }

    fn position_at(&self, now: Instant) -> GeoPoint {
        self.start.interpolate(self.end, self.progress(now))
    }

    fn done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Glides the rendered marker toward each new target position and manages
/// the moving/idle icon swap.
///
/// Assigning a new target atomically supersedes the in-flight segment and
/// discards any pending idle swap, so a stale swap can never fire after a
/// later movement.
pub struct MarkerAnimator {
    rendered: GeoPoint,
    bearing_deg: f64,
    icon: MarkerIcon,
    segment: Option<AnimationSegment>,
    idle_at: Option<Instant>,
}

impl MarkerAnimator {
    pub fn new(start: GeoPoint) -> Self {
        Self {
            rendered: start,
            bearing_deg: 0.0,
            icon: MarkerIcon::Idle,
            segment: None,
            idle_at: None,
        }
    }

    /// Begin gliding from the last rendered position toward `target`. The
    /// bearing is computed once here and held for the whole segment. A
    /// target equal to the rendered position starts nothing.
    pub fn set_target(&mut self, target: GeoPoint, now: Instant) {
        if self.rendered.same_position(&target) {
            return;
        }

        self.bearing_deg = bearing_deg(self.rendered, target);
        self.icon = MarkerIcon::Moving;
        self.idle_at = None;
        self.segment = Some(AnimationSegment {
            start: self.rendered,
            end: target,
            started_at: now,
        });
    }

    /// Advance the rendered position for this frame. Returns it.
    pub fn on_frame(&mut self, now: Instant) -> GeoPoint {
        if let Some(segment) = self.segment {
            self.rendered = segment.position_at(now);
            if segment.done(now) {
                self.rendered = segment.end;
                self.segment = None;
                self.idle_at = Some(now + IDLE_DELAY);
            }
        } else if let Some(idle_at) = self.idle_at {
            if now >= idle_at {
                self.icon = MarkerIcon::Idle;
                self.idle_at = None;
            }
        }
        self.rendered
    }

    pub fn position(&self) -> GeoPoint {
        self.rendered
    }

    pub fn bearing_deg(&self) -> f64 {
        self.bearing_deg
    }

    pub fn icon(&self) -> MarkerIcon {
        self.icon
    }

    pub fn is_settled(&self) -> bool {
        self.segment.is_none() && self.idle_at.is_none()
    }
}

/// Compass heading of the straight-line displacement, in degrees:
/// `atan2(Δlng, Δlat)` rotated +90° to match the marker icon's orientation.
pub fn bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    let dlng = to.lng - from.lng;
    let dlat = to.lat - from.lat;
    dlng.atan2(dlat).to_degrees() + 90.0
}
