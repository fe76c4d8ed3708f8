/// Profile samples along a cross-section of a bathymetric feature
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which end of the relief a feature is described by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Bathymetric high (seamount, ridge, bank): attributes describe the top
    #[default]
    High,
    /// Bathymetric low (valley, canyon, depression): attributes describe the bottom
    Low,
}

impl Polarity {
    /// Word used in attribute labels and column names ("top" / "bottom").
    pub fn extreme_label(&self) -> &'static str {
        match self {
            Polarity::High => "top",
            Polarity::Low => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSample {
    /// Index along the profile, 0..N-1
    pub position: usize,
    /// Position the sample was delivered with (e.g. OBJECTID of the point)
    pub source_id: usize,
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Ordered, immutable sequence of at least two samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    samples: Vec<ProfileSample>,
}

impl Profile {
    /// Build a profile from `(source_id, x, y, depth)` records already in
    /// traversal order. Source ids must be strictly increasing; they are kept
    /// for reporting and the samples are re-indexed from 0.
    pub fn new(records: Vec<(usize, f64, f64, f64)>) -> Result<Self> {
        if records.len() < 2 {
            return Err(Error::invalid_profile(format!(
                "expected at least 2 samples, got {}",
                records.len()
            )));
        }

        let mut samples = Vec::with_capacity(records.len());
        for (position, (source_id, x, y, depth)) in records.into_iter().enumerate() {
            if !(x.is_finite() && y.is_finite() && depth.is_finite()) {
                return Err(Error::invalid_profile(format!(
                    "non-finite value at sample {source_id}"
                )));
            }
            if let Some(prev) = samples.last().map(|s: &ProfileSample| s.source_id) {
                if source_id <= prev {
                    return Err(Error::invalid_profile(format!(
                        "positions not strictly increasing ({prev} then {source_id})"
                    )));
                }
            }
            samples.push(ProfileSample {
                position,
                source_id,
                x,
                y,
                depth,
            });
        }

        Ok(Profile { samples })
    }

    /// Convenience constructor for samples given as `(x, y, depth)` in order.
    pub fn from_points(points: &[(f64, f64, f64)]) -> Result<Self> {
        Self::new(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y, depth))| (i, x, y, depth))
                .collect(),
        )
    }

    pub fn samples(&self) -> &[ProfileSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed profile; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> &ProfileSample {
        &self.samples[0]
    }

    pub fn last(&self) -> &ProfileSample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn depths(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.depth).collect()
    }

    pub fn max_depth(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.depth)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_depth(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.depth)
            .fold(f64::INFINITY, f64::min)
    }

    /// First sample holding the highest value (ties go to the earliest)
    pub fn highest(&self) -> &ProfileSample {
        let mut best = &self.samples[0];
        for s in &self.samples[1..] {
            if s.depth > best.depth {
                best = s;
            }
        }
        best
    }

    /// First sample holding the lowest value (ties go to the earliest)
    pub fn lowest(&self) -> &ProfileSample {
        let mut best = &self.samples[0];
        for s in &self.samples[1..] {
            if s.depth < best.depth {
                best = s;
            }
        }
        best
    }

    /// Knick-point grouping window derived from sample count.
    pub fn default_gap(&self) -> usize {
        if self.len() > 10 {
            4
        } else {
            3
        }
    }
}
