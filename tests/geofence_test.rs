use assessment_backend::utils::geo::{haversine_distance, within_radius, EARTH_RADIUS_METERS};

/// Meters spanned by one degree of latitude on the spherical model.
fn meters_per_degree() -> f64 {
    std::f64::consts::PI * EARTH_RADIUS_METERS / 180.0
}

#[test]
fn distance_to_self_is_zero() {
    assert_eq!(haversine_distance(22.3151, 73.1444, 22.3151, 73.1444), 0.0);

    let check = within_radius(22.3151, 73.1444, 22.3151, 73.1444, 0.0);
    assert!(check.within);
    assert_eq!(check.distance_meters, 0);
}

#[test]
fn one_degree_of_latitude_spans_the_expected_arc() {
    let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
    assert!((d - meters_per_degree()).abs() < 0.5, "got {}", d);

    // Same arc along the equator.
    let d = haversine_distance(0.0, 0.0, 0.0, 1.0);
    assert!((d - meters_per_degree()).abs() < 0.5, "got {}", d);
}

#[test]
fn distance_is_symmetric() {
    let forward = haversine_distance(22.3151, 73.1444, 48.8566, 2.3522);
    let back = haversine_distance(48.8566, 2.3522, 22.3151, 73.1444);
    assert!((forward - back).abs() < 1e-6);
}

#[test]
fn crossing_the_antimeridian_stays_short() {
    let d = haversine_distance(0.0, 179.5, 0.0, -179.5);
    assert!((d - meters_per_degree()).abs() < 1.0, "got {}", d);
}

#[test]
fn inclusion_decision_matches_the_registered_radius() {
    let (center_lat, center_lon) = (22.3151, 73.1444);

    // A point 250 m due north sits inside a 300 m fence.
    let near_lat = center_lat + 250.0 / meters_per_degree();
    let near = within_radius(near_lat, center_lon, center_lat, center_lon, 300.0);
    assert!(near.within);
    assert_eq!(near.distance_meters, 250);

    // A point 350 m due north does not.
    let far_lat = center_lat + 350.0 / meters_per_degree();
    let far = within_radius(far_lat, center_lon, center_lat, center_lon, 300.0);
    assert!(!far.within);
    assert_eq!(far.distance_meters, 350);
}

#[test]
fn boundary_is_inclusive() {
    let point_lat = 0.9;
    let d = haversine_distance(point_lat, 0.0, 0.0, 0.0);

    let on_fence = within_radius(point_lat, 0.0, 0.0, 0.0, d);
    assert!(on_fence.within);

    let shrunk_fence = within_radius(point_lat, 0.0, 0.0, 0.0, d - 0.001);
    assert!(!shrunk_fence.within);
}
