use approx::assert_abs_diff_eq;
use geoframe::constants::CartesianPoint;
use rand::rngs::StdRng;
use rand::Rng;

pub fn assert_point_close(actual: &CartesianPoint, expected: &CartesianPoint, epsilon: f64) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_abs_diff_eq!(actual.z, expected.z, epsilon = epsilon);
}

/// Random `(latitude°, longitude°, height m)` with the height drawn in `heights`.
#[allow(dead_code)]
pub fn random_geodetic(rng: &mut StdRng, heights: std::ops::Range<f64>) -> (f64, f64, f64) {
    (
        rng.random_range(-89.9..89.9),
        rng.random_range(-179.9..180.0),
        rng.random_range(heights),
    )
}
