/// Batch driver - classify every profile of every feature, in parallel,
/// collecting one outcome per feature instead of aborting on the first error
use crate::analysis::profile_attributes;
use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use crate::profile::Profile;
use crate::shape_classifier::{ProfileAttributes, ProfileShape};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Samples of one profile as delivered by the profile source:
/// `(position, x, y, depth)` in traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePoints {
    pub profile_id: String,
    pub samples: Vec<(usize, f64, f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureProfiles {
    pub feature_id: String,
    pub profiles: Vec<ProfilePoints>,
}

/// Boundary to whatever cuts cross-sections through feature polygons and
/// samples depths along them.
pub trait ProfileSource {
    fn features(&self) -> Result<Vec<FeatureProfiles>>;
}

impl ProfileSource for Vec<FeatureProfiles> {
    fn features(&self) -> Result<Vec<FeatureProfiles>> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone)]
pub enum FeatureOutcome {
    Classified {
        feature_id: String,
        /// `(profile_id, attributes)` in source order
        profiles: Vec<(String, ProfileAttributes)>,
    },
    Failed {
        feature_id: String,
        cause: String,
    },
}

impl FeatureOutcome {
    pub fn feature_id(&self) -> &str {
        match self {
            FeatureOutcome::Classified { feature_id, .. } => feature_id,
            FeatureOutcome::Failed { feature_id, .. } => feature_id,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FeatureOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FeatureOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FeatureOutcome> {
        self.outcomes.iter().filter(|o| !o.is_failed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FeatureOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.len() - self.failure_count()
    }

    /// Number of classified profiles per shape
    pub fn shape_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for outcome in &self.outcomes {
            if let FeatureOutcome::Classified { profiles, .. } = outcome {
                for (_, attrs) in profiles {
                    *counts.entry(attrs.shape.to_string()).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    pub fn flat_profile_count(&self) -> usize {
        self.shape_counts()
            .get(&ProfileShape::Flat.to_string())
            .copied()
            .unwrap_or(0)
    }
}

/// Classify all profiles of one feature. Any failing profile fails the feature.
pub fn classify_feature(
    feature: &FeatureProfiles,
    config: &ClassifierConfig,
) -> Result<Vec<(String, ProfileAttributes)>> {
    if feature.profiles.is_empty() {
        return Err(Error::MissingFeature(feature.feature_id.clone()));
    }

    feature
        .profiles
        .iter()
        .map(|points| {
            let profile = Profile::new(points.samples.clone())?;
            let attributes = profile_attributes(&profile, config)?;
            debug!(
                feature = %feature.feature_id,
                profile = %points.profile_id,
                shape = %attributes.shape,
                "profile classified"
            );
            Ok((points.profile_id.clone(), attributes))
        })
        .collect()
}

fn outcome_for(feature: &FeatureProfiles, config: &ClassifierConfig) -> FeatureOutcome {
    match classify_feature(feature, config) {
        Ok(profiles) => FeatureOutcome::Classified {
            feature_id: feature.feature_id.clone(),
            profiles,
        },
        Err(e) => {
            warn!("failed on {}: {}", feature.feature_id, e);
            FeatureOutcome::Failed {
                feature_id: feature.feature_id.clone(),
                cause: e.to_string(),
            }
        }
    }
}

/// Classify features in parallel. Only configuration or thread pool problems
/// are returned as errors; per-feature failures land in the report.
pub fn classify_features(
    features: &[FeatureProfiles],
    config: &ClassifierConfig,
) -> Result<BatchReport> {
    config.validate()?;

    let threads = if config.workers == 0 {
        num_cpus::get()
    } else {
        config.workers
    };
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    info!(
        "Classifying {} features on {} threads",
        features.len(),
        threads
    );

    let processed = AtomicUsize::new(0);
    let total = features.len();

    let outcomes: Vec<FeatureOutcome> = pool.install(|| {
        features
            .par_iter()
            .map(|feature| {
                let outcome = outcome_for(feature, config);
                let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if count % 500 == 0 || count == total {
                    info!("Progress: {}/{} features", count, total);
                }
                outcome
            })
            .collect()
    });

    let report = BatchReport { outcomes };
    if report.failure_count() > 0 {
        warn!(
            "{} of {} features failed and were left without attributes",
            report.failure_count(),
            total
        );
    }
    Ok(report)
}

/// Pull features from `source` and classify them.
pub fn run_batch(source: &dyn ProfileSource, config: &ClassifierConfig) -> Result<BatchReport> {
    let features = source.features()?;
    classify_features(&features, config)
}
