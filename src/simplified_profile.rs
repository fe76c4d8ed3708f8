/// Simplified profile: endpoints plus one representative per knick group,
/// treated as a closed polygon for slope and angle measurements
use crate::geometry::{distance, slope_angle_degrees};
use crate::profile::{Profile, ProfileSample};

#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedProfile {
    samples: Vec<ProfileSample>,
}

/// Closed-ring measurements of a simplified profile. Segment `i` runs from
/// vertex `i` to `i + 1`; the last one wraps back to vertex 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RingGeometry {
    pub distances: Vec<f64>,
    pub slopes: Vec<f64>,
    pub angles: Vec<f64>,
}

impl SimplifiedProfile {
    /// Key samples from `profile`: first, the given interior positions, last.
    /// Positions outside the interior are ignored.
    pub fn from_knicks(profile: &Profile, knick_positions: &[usize]) -> Self {
        let last = profile.len() - 1;
        let mut positions: Vec<usize> = knick_positions
            .iter()
            .copied()
            .filter(|&p| p > 0 && p < last)
            .collect();
        positions.sort_unstable();
        positions.dedup();

        let all = profile.samples();
        let mut samples = Vec::with_capacity(positions.len() + 2);
        samples.push(all[0]);
        samples.extend(positions.iter().map(|&p| all[p]));
        samples.push(all[last]);

        SimplifiedProfile { samples }
    }

    pub fn samples(&self) -> &[ProfileSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn positions(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.position).collect()
    }

    /// Straight-line distance closing the ring (last vertex back to first)
    pub fn closure_length(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(a), Some(b)) => distance(b.x, b.y, a.x, a.y),
            _ => 0.0,
        }
    }

    pub fn ring_geometry(&self) -> RingGeometry {
        let (distances, slopes) = profile_slope(&self.samples);
        let angles = profile_angle(&slopes);
        RingGeometry {
            distances,
            slopes,
            angles,
        }
    }
}

/// Per-segment distances and absolute slope angles around the closed ring.
pub fn profile_slope(samples: &[ProfileSample]) -> (Vec<f64>, Vec<f64>) {
    let n = samples.len();
    (0..n)
        .map(|i| {
            let from = &samples[i];
            let to = &samples[(i + 1) % n];
            let d = distance(from.x, from.y, to.x, to.y);
            (d, slope_angle_degrees(to.depth, from.depth, d).abs())
        })
        .unzip()
}

/// Turn at each ring vertex derived from adjoining segment slopes.
pub fn profile_angle(slopes: &[f64]) -> Vec<f64> {
    let n = slopes.len();
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            if i == 0 {
                (slopes[0] - slopes[n - 1]).abs()
            } else if i == n - 1 {
                (slopes[n - 1] - slopes[i - 1]).abs()
            } else {
                180.0 - (slopes[i - 1] - slopes[i]).abs()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn triangle() -> Profile {
        Profile::from_points(&[(0.0, 0.0, 0.0), (5.0, 0.0, -10.0), (10.0, 0.0, 0.0)]).unwrap()
    }

    #[test]
    fn test_from_knicks_keeps_endpoints() {
        let profile = triangle();
        let flat = SimplifiedProfile::from_knicks(&profile, &[]);
        assert_eq!(flat.positions(), vec![0, 2]);

        // Endpoints and duplicates in the input are not repeated
        let tri = SimplifiedProfile::from_knicks(&profile, &[1, 0, 1, 2]);
        assert_eq!(tri.positions(), vec![0, 1, 2]);
        assert_abs_diff_eq!(tri.closure_length(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ring_slopes_wrap_around() {
        let tri = SimplifiedProfile::from_knicks(&triangle(), &[1]);
        let geometry = tri.ring_geometry();

        let side = (10.0f64 / 5.0).atan().to_degrees();
        assert_eq!(geometry.distances.len(), 3);
        assert_abs_diff_eq!(geometry.distances[0], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.distances[2], 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.slopes[0], side, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.slopes[1], side, epsilon = 1e-12);
        // Closing segment runs between the two equal-depth endpoints
        assert_abs_diff_eq!(geometry.slopes[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_profile_angle_rules() {
        let slopes = [20.0, 5.0, 30.0, 2.0];
        let angles = profile_angle(&slopes);
        assert_eq!(angles, vec![18.0, 165.0, 155.0, 28.0]);
        assert!(profile_angle(&[]).is_empty());
    }

    #[test]
    fn test_two_point_ring_yields_zero_turns() {
        let profile = Profile::from_points(&[(0.0, 0.0, -5.0), (3.0, 4.0, -5.0)]).unwrap();
        let geometry = SimplifiedProfile::from_knicks(&profile, &[]).ring_geometry();
        assert_eq!(geometry.distances, vec![5.0, 5.0]);
        assert_eq!(geometry.angles, vec![0.0, 0.0]);
    }
}
