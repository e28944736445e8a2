use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One GPS fix. Immutable once produced by the loader or the snap adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            timestamp: None,
        }
    }

    pub fn at(lat: f64, lng: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            lat,
            lng,
            timestamp: Some(timestamp),
        }
    }

    /// Linear per-axis interpolation. Not great-circle; fine at city scale.
    pub fn interpolate(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
            timestamp: None,
        }
    }

    /// Positional equality, ignoring timestamps.
    pub fn same_position(&self, other: &Self) -> bool {
        self.lat == other.lat && self.lng == other.lng
    }
}

/// Playback period selector. The labels mirror the tracking UI; the actual
/// window derivation per label lives in the engine's period filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackPeriod {
    Today,
    Yesterday,
    ThisWeek,
    PreviousWeek,
    ThisMonth,
    PreviousMonth,
    Custom,
}

impl TrackPeriod {
    pub const ALL: [TrackPeriod; 7] = [
        TrackPeriod::Today,
        TrackPeriod::Yesterday,
        TrackPeriod::ThisWeek,
        TrackPeriod::PreviousWeek,
        TrackPeriod::ThisMonth,
        TrackPeriod::PreviousMonth,
        TrackPeriod::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrackPeriod::Today => "Today",
            TrackPeriod::Yesterday => "Yesterday",
            TrackPeriod::ThisWeek => "This Week",
            TrackPeriod::PreviousWeek => "Previous Week",
            TrackPeriod::ThisMonth => "This Month",
            TrackPeriod::PreviousMonth => "Previous Month",
            TrackPeriod::Custom => "Custom",
        }
    }
}

impl fmt::Display for TrackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TrackPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(TrackPeriod::Today),
            "yesterday" => Ok(TrackPeriod::Yesterday),
            "this-week" | "this week" => Ok(TrackPeriod::ThisWeek),
            "previous-week" | "previous week" => Ok(TrackPeriod::PreviousWeek),
            "this-month" | "this month" => Ok(TrackPeriod::ThisMonth),
            "previous-month" | "previous month" => Ok(TrackPeriod::PreviousMonth),
            "custom" => Ok(TrackPeriod::Custom),
            other => Err(format!("unknown period: {other}")),
        }
    }
}

/// Playback speed presets offered by the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    /// 0.5x
    Half,
    /// 1x
    Normal,
    /// 2x
    Double,
    /// 5x
    Fast,
}

impl PlaybackSpeed {
    pub const ALL: [PlaybackSpeed; 4] = [
        PlaybackSpeed::Half,
        PlaybackSpeed::Normal,
        PlaybackSpeed::Double,
        PlaybackSpeed::Fast,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Double => 2.0,
            PlaybackSpeed::Fast => 5.0,
        }
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackSpeed::Half => f.write_str("0.5x"),
            PlaybackSpeed::Normal => f.write_str("1x"),
            PlaybackSpeed::Double => f.write_str("2x"),
            PlaybackSpeed::Fast => f.write_str("5x"),
        }
    }
}

impl FromStr for PlaybackSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches('x') {
            "0.5" => Ok(PlaybackSpeed::Half),
            "1" => Ok(PlaybackSpeed::Normal),
            "2" => Ok(PlaybackSpeed::Double),
            "5" => Ok(PlaybackSpeed::Fast),
            other => Err(format!("unknown speed preset: {other}")),
        }
    }
}

/// Visual state of the vehicle marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerIcon {
    Moving,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    pub position: GeoPoint,
    pub bearing_deg: f64,
    pub icon: MarkerIcon,
}

/// Everything a renderer needs to draw one frame of the map: tile layer,
/// base route polyline, optional history overlay, and the single marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapScene {
    pub tile_url: String,
    pub center: GeoPoint,
    pub base_route: Vec<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_overlay: Option<Vec<GeoPoint>>,
    pub marker: MarkerView,
}
