/// Per-profile pipeline: detect -> group -> simplify -> classify
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::knick_detector::{detect_knick_points, KnickDetection};
use crate::knick_grouping::{group_knick_points, representatives};
use crate::profile::Profile;
use crate::shape_classifier::{classify, ProfileAttributes};
use crate::simplified_profile::{RingGeometry, SimplifiedProfile};

#[derive(Debug, Clone)]
pub struct ProfileAnalysis {
    pub attributes: ProfileAttributes,
    pub detection: KnickDetection,
    pub gap: usize,
    pub groups: Vec<Vec<usize>>,
    pub simplified: SimplifiedProfile,
    pub geometry: RingGeometry,
    /// One flag per profile sample; true for the simplified profile's vertices
    pub knick_flags: Vec<bool>,
}

pub fn analyze_profile(profile: &Profile, config: &ClassifierConfig) -> Result<ProfileAnalysis> {
    config.validate()?;

    let detection = detect_knick_points(profile, &config.knick);
    let gap = config.gap.unwrap_or_else(|| profile.default_gap());
    let groups = group_knick_points(&detection.sorted_positions(), gap);
    let simplified = SimplifiedProfile::from_knicks(profile, &representatives(&groups, profile.len()));
    let geometry = simplified.ring_geometry();
    let attributes = classify(profile, &simplified, &geometry, config);

    let mut knick_flags = vec![false; profile.len()];
    for position in simplified.positions() {
        knick_flags[position] = true;
    }

    Ok(ProfileAnalysis {
        attributes,
        detection,
        gap,
        groups,
        simplified,
        geometry,
        knick_flags,
    })
}

/// Attributes only, for callers that do not need the detection trace.
pub fn profile_attributes(profile: &Profile, config: &ClassifierConfig) -> Result<ProfileAttributes> {
    analyze_profile(profile, config).map(|analysis| analysis.attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape_classifier::{Concavity, ExtremeSlopeClass, ProfileShape, SlopeClass};

    #[test]
    fn test_triangle_profile() {
        let profile =
            Profile::from_points(&[(0.0, 0.0, 0.0), (5.0, 0.0, -10.0), (10.0, 0.0, 0.0)]).unwrap();
        let analysis = analyze_profile(&profile, &ClassifierConfig::high()).unwrap();

        assert_eq!(analysis.simplified.len(), 3);
        assert_eq!(analysis.attributes.shape, ProfileShape::Triangle);
        assert_eq!(analysis.attributes.concavity, Some(Concavity::Convex));
        assert_eq!(analysis.attributes.extreme_slope_class, ExtremeSlopeClass::Absent);
        assert_eq!(analysis.attributes.side_slope_class, Some(SlopeClass::Steep));
        assert_eq!(analysis.attributes.extreme_depth, Some(0.0));
        assert_eq!(analysis.knick_flags, vec![true, true, true]);
    }

    #[test]
    fn test_five_sample_scenario_is_not_flat() {
        let depths = [0.0, -2.0, -8.0, -3.0, 0.0];
        let points: Vec<(f64, f64, f64)> = depths
            .iter()
            .enumerate()
            .map(|(i, &d)| (i as f64 * 10.0, 0.0, d))
            .collect();
        let profile = Profile::from_points(&points).unwrap();
        let analysis = analyze_profile(&profile, &ClassifierConfig::low()).unwrap();

        assert!(analysis.simplified.len() >= 3);
        assert_eq!(analysis.simplified.positions(), vec![0, 2, 4]);
        assert_ne!(analysis.attributes.shape, ProfileShape::Flat);
        assert_eq!(analysis.attributes.extreme_depth, Some(-8.0));
        assert_eq!(analysis.gap, 3);
    }

    #[test]
    fn test_constant_depth_is_flat() {
        let points: Vec<(f64, f64, f64)> = (0..15).map(|i| (0.0, i as f64 * 30.0, -250.0)).collect();
        let profile = Profile::from_points(&points).unwrap();
        let analysis = analyze_profile(&profile, &ClassifierConfig::default()).unwrap();

        assert_eq!(analysis.simplified.len(), 2);
        assert_eq!(analysis.attributes.shape, ProfileShape::Flat);
        assert_eq!(analysis.attributes.symmetry, None);
        assert_eq!(analysis.gap, 4);
    }

    #[test]
    fn test_gap_override_is_validated() {
        let profile = Profile::from_points(&[(0.0, 0.0, 0.0), (1.0, 0.0, 1.0)]).unwrap();
        assert!(analyze_profile(&profile, &ClassifierConfig::default().with_gap(0)).is_err());
        let analysis = analyze_profile(&profile, &ClassifierConfig::default().with_gap(7)).unwrap();
        assert_eq!(analysis.gap, 7);
    }
}
