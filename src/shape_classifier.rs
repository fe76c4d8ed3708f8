/// Shape Classifier - categorical descriptors of a simplified profile
use crate::config::ClassifierConfig;
use crate::profile::{Polarity, Profile};
use crate::simplified_profile::{RingGeometry, SimplifiedProfile};
use crate::stats::{mean, skewness};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProfileShape {
    Flat,
    Triangle,
    Irregular,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Symmetry {
    Symmetric,
    Asymmetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Concavity {
    Convex,
    Concave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeClass {
    Flat,
    Gentle,
    Moderate,
    Steep,
}

/// Slope class of the feature's top (highs) or bottom (lows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremeSlopeClass {
    Class(SlopeClass),
    /// Triangle profile: the feature has no top / no bottom
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileAttributes {
    pub polarity: Polarity,
    pub shape: ProfileShape,
    /// None when the profile is flat
    pub symmetry: Option<Symmetry>,
    pub concavity: Option<Concavity>,
    pub extreme_slope_class: ExtremeSlopeClass,
    pub side_slope_class: Option<SlopeClass>,
    /// Top depth (highs) or bottom depth (lows) of the full profile
    pub extreme_depth: Option<f64>,
    pub relief: Option<f64>,
    pub length: Option<f64>,
}

impl SlopeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlopeClass::Flat => "flat",
            SlopeClass::Gentle => "gentle",
            SlopeClass::Moderate => "moderate",
            SlopeClass::Steep => "steep",
        }
    }
}

impl fmt::Display for SlopeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProfileShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Concavity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl ExtremeSlopeClass {
    /// "flat".."steep", or "no top" / "no bottom" depending on polarity
    pub fn label(&self, polarity: Polarity) -> String {
        match self {
            ExtremeSlopeClass::Class(class) => class.to_string(),
            ExtremeSlopeClass::Absent => format!("no {}", polarity.extreme_label()),
        }
    }
}

/// `< 5` flat, `< 10` gentle, `< 30` moderate, otherwise steep (degrees).
pub fn slope_class(angle_degrees: f64) -> SlopeClass {
    if angle_degrees < 5.0 {
        SlopeClass::Flat
    } else if angle_degrees < 10.0 {
        SlopeClass::Gentle
    } else if angle_degrees < 30.0 {
        SlopeClass::Moderate
    } else {
        SlopeClass::Steep
    }
}

/// Strictly below `threshold` in magnitude is symmetric; NaN is not.
pub fn symmetry_of(skew: f64, threshold: f64) -> Symmetry {
    if skew.abs() < threshold {
        Symmetry::Symmetric
    } else {
        Symmetry::Asymmetric
    }
}

/// Length-weighted mean of the two side segments' slopes. Falls back to the
/// plain mean when either side has zero length.
pub fn side_slope(slope_a: f64, dist_a: f64, slope_b: f64, dist_b: f64) -> f64 {
    let (slope_a, slope_b) = (slope_a.abs(), slope_b.abs());
    let (dist_a, dist_b) = (dist_a.abs(), dist_b.abs());
    if dist_a == 0.0 || dist_b == 0.0 {
        (slope_a + slope_b) / 2.0
    } else {
        let total = dist_a + dist_b;
        slope_a * dist_a / total + slope_b * dist_b / total
    }
}

/// Any polygon angle above 180 makes the profile concave and irregular.
pub fn polygon_shape(angles: &[f64]) -> (ProfileShape, Concavity) {
    let max_angle = angles.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_angle > 180.0 {
        (ProfileShape::Irregular, Concavity::Concave)
    } else {
        (ProfileShape::Regular, Concavity::Convex)
    }
}

pub fn classify(
    profile: &Profile,
    simplified: &SimplifiedProfile,
    geometry: &RingGeometry,
    config: &ClassifierConfig,
) -> ProfileAttributes {
    let polarity = config.polarity;
    let n = simplified.len();

    if n <= 2 {
        return ProfileAttributes {
            polarity,
            shape: ProfileShape::Flat,
            symmetry: None,
            concavity: None,
            extreme_slope_class: ExtremeSlopeClass::Class(SlopeClass::Flat),
            side_slope_class: None,
            extreme_depth: None,
            relief: None,
            length: None,
        };
    }

    let skew = skewness(&profile.depths(), config.skewness);
    let symmetry = symmetry_of(skew, config.symmetry_threshold);
    let slopes = &geometry.slopes;
    let distances = &geometry.distances;

    let (shape, concavity, extreme_slope_class, side) = if n == 3 {
        let side = side_slope(slopes[0], distances[0], slopes[1], distances[1]);
        (
            ProfileShape::Triangle,
            Concavity::Convex,
            ExtremeSlopeClass::Absent,
            side,
        )
    } else {
        let side = side_slope(slopes[0], distances[0], slopes[n - 2], distances[n - 2]);
        let extreme = mean(&slopes[1..n - 2]).abs();
        let (shape, concavity) = polygon_shape(&geometry.angles);
        (
            shape,
            concavity,
            ExtremeSlopeClass::Class(slope_class(extreme)),
            side,
        )
    };

    let (max_depth, min_depth) = (profile.max_depth(), profile.min_depth());
    let extreme_depth = match polarity {
        Polarity::High => max_depth,
        Polarity::Low => min_depth,
    };

    ProfileAttributes {
        polarity,
        shape,
        symmetry: Some(symmetry),
        concavity: Some(concavity),
        extreme_slope_class,
        side_slope_class: Some(slope_class(side)),
        extreme_depth: Some(extreme_depth),
        relief: Some(max_depth - min_depth),
        length: Some(simplified.closure_length()),
    }
}
