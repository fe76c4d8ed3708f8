//! Error types for seabed profile analysis

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Feature {0} has no profiles")]
    MissingFeature(String),
}

impl Error {
    pub(crate) fn invalid_profile(reason: impl Into<String>) -> Self {
        Error::InvalidProfile {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
