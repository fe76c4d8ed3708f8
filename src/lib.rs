//! Profile shape attributes for bathymetric highs and lows.
//!
//! A profile is an ordered series of depth samples along a cross-section of a
//! seabed feature. Knick points (abrupt slope changes) are detected
//! iteratively, neighbouring knick points are merged, and the simplified
//! profile that remains is classified by shape, symmetry, concavity and
//! slope classes.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod geometry;
pub mod knick_detector;
pub mod knick_grouping;
pub mod profile;
pub mod profile_reader;
pub mod report_writer;
pub mod shape_classifier;
pub mod simplified_profile;
pub mod stats;

pub use analysis::{analyze_profile, profile_attributes, ProfileAnalysis};
pub use batch::{
    classify_features, run_batch, BatchReport, FeatureOutcome, FeatureProfiles, ProfilePoints,
    ProfileSource,
};
pub use config::{ClassifierConfig, KnickConfig, ThresholdCarry};
pub use error::{Error, Result};
pub use profile::{Polarity, Profile, ProfileSample};
pub use shape_classifier::{
    Concavity, ExtremeSlopeClass, ProfileAttributes, ProfileShape, SlopeClass, Symmetry,
};
pub use stats::SkewnessConvention;
