use crate::error::{Error, Result};
use crate::profile::Polarity;
use crate::stats::SkewnessConvention;
use serde::{Deserialize, Serialize};

/// How the slope threshold is carried between detection rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThresholdCarry {
    /// Each round uses the carry percentile of the round just completed
    #[default]
    PreviousRound,
    /// Every round after the first reuses the first round's carry percentile
    FirstRound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnickConfig {
    /// Percentile of the current round's diff-slopes a candidate must reach
    pub selection_percentile: f64,
    /// Percentile of a finished round's diff-slopes used as the next threshold
    pub carry_percentile: f64,
    /// Floor in degrees; suppresses knick points on near-flat profiles
    pub min_diff_slope: f64,
    pub threshold_carry: ThresholdCarry,
}

impl Default for KnickConfig {
    fn default() -> Self {
        KnickConfig {
            selection_percentile: 0.99,
            carry_percentile: 0.95,
            min_diff_slope: 1.0,
            threshold_carry: ThresholdCarry::PreviousRound,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub polarity: Polarity,
    /// Grouping window override; None derives it from each profile's length
    pub gap: Option<usize>,
    pub knick: KnickConfig,
    /// |skewness| strictly below this is Symmetric
    pub symmetry_threshold: f64,
    pub skewness: SkewnessConvention,
    /// Worker threads for batch runs (0 = one per logical core)
    pub workers: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            polarity: Polarity::High,
            gap: None,
            knick: KnickConfig::default(),
            symmetry_threshold: 0.2,
            skewness: SkewnessConvention::Population,
            workers: 0,
        }
    }
}

impl ClassifierConfig {
    /// Bathymetric highs (top-of-feature attributes)
    pub fn high() -> Self {
        ClassifierConfig {
            polarity: Polarity::High,
            ..Default::default()
        }
    }

    /// Bathymetric lows (bottom-of-feature attributes)
    pub fn low() -> Self {
        ClassifierConfig {
            polarity: Polarity::Low,
            ..Default::default()
        }
    }

    /// Reproduces the legacy toolbox output: first-round threshold carry and
    /// pandas-style sample skewness.
    pub fn legacy(polarity: Polarity) -> Self {
        ClassifierConfig {
            polarity,
            knick: KnickConfig {
                threshold_carry: ThresholdCarry::FirstRound,
                ..Default::default()
            },
            skewness: SkewnessConvention::Sample,
            ..Default::default()
        }
    }

    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(gap) = self.gap {
            if gap == 0 {
                return Err(Error::InvalidParameter {
                    name: "gap",
                    value: gap.to_string(),
                    reason: "must be at least 1".into(),
                });
            }
        }
        for (name, value) in [
            ("selection_percentile", self.knick.selection_percentile),
            ("carry_percentile", self.knick.carry_percentile),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidParameter {
                    name,
                    value: value.to_string(),
                    reason: "must lie in [0, 1]".into(),
                });
            }
        }
        if !self.knick.min_diff_slope.is_finite() || self.knick.min_diff_slope < 0.0 {
            return Err(Error::InvalidParameter {
                name: "min_diff_slope",
                value: self.knick.min_diff_slope.to_string(),
                reason: "must be a non-negative angle".into(),
            });
        }
        if !self.symmetry_threshold.is_finite() || self.symmetry_threshold < 0.0 {
            return Err(Error::InvalidParameter {
                name: "symmetry_threshold",
                value: self.symmetry_threshold.to_string(),
                reason: "must be non-negative".into(),
            });
        }
        Ok(())
    }
}
