use shared::GeoPoint;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two fixes.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Instantaneous ground speed in km/h between `window[index - 1]` and
/// `window[index]`, from the haversine distance over the timestamp delta.
///
/// Index 0, a window shorter than two points, missing timestamps, or a
/// non-positive time delta all read as standing still.
pub fn speed_kmh(index: usize, window: &[GeoPoint]) -> f64 {
    if index == 0 || window.len() <= 1 || index >= window.len() {
        return 0.0;
    }

    let prev = window[index - 1];
    let curr = window[index];
    let (Some(t1), Some(t2)) = (prev.timestamp, curr.timestamp) else {
        return 0.0;
    };

    let elapsed_h = (t2 - t1).num_milliseconds() as f64 / 3_600_000.0;
    if elapsed_h <= 0.0 {
        return 0.0;
    }

    haversine_m(prev, curr) / 1_000.0 / elapsed_h
}

/// Two-decimal display form used by the marker info card.
pub fn speed_label(index: usize, window: &[GeoPoint]) -> String {
    format!("{:.2}", speed_kmh(index, window))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[test]
    fn haversine_same_point_is_zero() {
        let p = GeoPoint::new(17.385044, 78.486671);
        assert_eq!(haversine_m(p, p), 0.0);
    }

    #[test]
    fn speed_at_index_zero_is_zero() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let window = vec![GeoPoint::at(17.0, 78.0, t), GeoPoint::at(17.1, 78.0, t)];
        assert_eq!(speed_label(0, &window), "0.00");
    }

    #[test]
    fn speed_for_short_window_is_zero() {
        let window = vec![GeoPoint::new(17.0, 78.0)];
        assert_eq!(speed_label(1, &window), "0.00");
    }

    #[test]
    fn speed_for_identical_points_is_zero() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let t1 = t0 + Duration::minutes(5);
        let window = vec![GeoPoint::at(17.0, 78.0, t0), GeoPoint::at(17.0, 78.0, t1)];
        assert_eq!(speed_label(1, &window), "0.00");
    }

    #[test]
    fn speed_for_non_positive_elapsed_time_is_zero() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let window = vec![GeoPoint::at(17.0, 78.0, t0), GeoPoint::at(17.1, 78.0, t0)];
        assert_eq!(speed_label(1, &window), "0.00");
    }

    #[test]
    fn one_km_per_hour_along_a_meridian() {
        // 1000 m north of the equator, one hour later.
        let dlat = (1_000.0 / EARTH_RADIUS_M).to_degrees();
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let t1 = t0 + Duration::hours(1);
        let window = vec![GeoPoint::at(0.0, 0.0, t0), GeoPoint::at(dlat, 0.0, t1)];
        assert_eq!(speed_label(1, &window), "1.00");
    }

    // Property-based tests using proptest
    mod proptests {
        use proptest::prelude::*;

        use super::*;

        fn valid_point() -> impl Strategy<Value = GeoPoint> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lng)| GeoPoint::new(lat, lng))
        }

        proptest! {
            #[test]
            fn prop_haversine_non_negative(a in valid_point(), b in valid_point()) {
                prop_assert!(haversine_m(a, b) >= 0.0);
            }

            #[test]
            fn prop_haversine_symmetric(a in valid_point(), b in valid_point()) {
                prop_assert!((haversine_m(a, b) - haversine_m(b, a)).abs() < 1e-6);
            }

            #[test]
            fn prop_haversine_same_point_is_zero(p in valid_point()) {
                prop_assert_eq!(haversine_m(p, p), 0.0);
            }

            #[test]
            fn prop_speed_without_timestamps_is_zero(
                points in prop::collection::vec(valid_point(), 2..8),
                index in 1usize..8
            ) {
                prop_assume!(index < points.len());
                prop_assert_eq!(speed_kmh(index, &points), 0.0);
            }
        }
    }
}
