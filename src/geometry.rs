/// Distance and slope primitives shared by detection and classification
use geo::{point, EuclideanDistance};

/// Planar distance between two points, always >= 0.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let a = point!(x: x1, y: y1);
    let b = point!(x: x2, y: y2);
    a.euclidean_distance(&b)
}

/// Signed slope angle in degrees from `elevation_start` to `elevation_end`
/// over `distance`. Coincident points saturate to 90 degrees.
pub fn slope_angle_degrees(elevation_end: f64, elevation_start: f64, distance: f64) -> f64 {
    if distance == 0.0 {
        90.0
    } else {
        ((elevation_end - elevation_start) / distance).atan().to_degrees()
    }
}
