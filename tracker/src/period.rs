use shared::{GeoPoint, TrackPeriod};

/// Strategy for deriving a history window from the snapped route.
///
/// The current implementations are placeholder heuristics rather than real
/// calendar filters; keeping one named implementation per behavior makes
/// that explicit and lets a calendar-aware filter replace any of them
/// without touching call sites.
pub trait PeriodFilter {
    fn window(&self, route: &[GeoPoint]) -> Vec<GeoPoint>;
}

/// First half of the route, order reversed.
struct ReversedFirstHalf;

/// Leading share of the route, original order.
struct LeadingShare(f64);

/// The entire route, original order.
struct FullRoute;

impl PeriodFilter for ReversedFirstHalf {
    fn window(&self, route: &[GeoPoint]) -> Vec<GeoPoint> {
        route[..route.len() / 2].iter().rev().copied().collect()
    }
}

impl PeriodFilter for LeadingShare {
    fn window(&self, route: &[GeoPoint]) -> Vec<GeoPoint> {
        let take = (route.len() as f64 * self.0).floor() as usize;
        route[..take].to_vec()
    }
}

impl PeriodFilter for FullRoute {
    fn window(&self, route: &[GeoPoint]) -> Vec<GeoPoint> {
        route.to_vec()
    }
}

pub fn filter_for(period: TrackPeriod) -> Box<dyn PeriodFilter> {
    match period {
        TrackPeriod::Yesterday => Box::new(ReversedFirstHalf),
        TrackPeriod::ThisWeek => Box::new(LeadingShare(0.8)),
        // No distinct heuristics yet for these periods.
        TrackPeriod::Today
        | TrackPeriod::PreviousWeek
        | TrackPeriod::ThisMonth
        | TrackPeriod::PreviousMonth
        | TrackPeriod::Custom => Box::new(FullRoute),
    }
}

/// Derive the history window for `period`. Always a subsequence (possibly
/// reversed) of `route`.
pub fn history_window(route: &[GeoPoint], period: TrackPeriod) -> Vec<GeoPoint> {
    filter_for(period).window(route)
}
