/// Spherical Earth approximation used for all geofence math.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in meters between two WGS84 coordinates using the
/// haversine formula. Pure; callers reject non-finite input before calling.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceCheck {
    pub within: bool,
    /// Nearest-meter distance, for display. The inclusion decision uses the
    /// unrounded distance.
    pub distance_meters: i64,
}

/// Inclusive-boundary containment check: a point exactly on the fence is in.
pub fn within_radius(
    user_lat: f64,
    user_lon: f64,
    center_lat: f64,
    center_lon: f64,
    radius_meters: f64,
) -> GeofenceCheck {
    let distance = haversine_distance(user_lat, user_lon, center_lat, center_lon);
    GeofenceCheck {
        within: distance <= radius_meters,
        distance_meters: distance.round() as i64,
    }
}
