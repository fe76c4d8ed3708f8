/// CSV output of batch results: one attribute row per classified feature,
/// one row per failed feature in a separate file
use crate::batch::{BatchReport, FeatureOutcome};
use crate::error::Result;
use crate::profile::Polarity;
use crate::shape_classifier::ProfileAttributes;
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;
use tracing::info;

const NA: &str = "NA";

/// Attribute values of all profiles of one feature, comma-joined per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureAttributesRow {
    pub feature_id: String,
    pub shape: String,
    pub symmetry: String,
    pub concavity: String,
    pub extreme_slope_class: String,
    pub side_slope_class: String,
    pub extreme_depth: String,
    pub relief: String,
    pub length: String,
}

#[derive(Debug, Serialize)]
struct FailureRow<'a> {
    feature_id: &'a str,
    error: &'a str,
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

fn join<'a>(
    profiles: &'a [(String, ProfileAttributes)],
    field: impl Fn(&'a ProfileAttributes) -> String,
) -> String {
    profiles
        .iter()
        .map(|(_, attrs)| field(attrs))
        .collect::<Vec<_>>()
        .join(",")
}

impl FeatureAttributesRow {
    pub fn new(feature_id: &str, profiles: &[(String, ProfileAttributes)]) -> Self {
        FeatureAttributesRow {
            feature_id: feature_id.to_string(),
            shape: join(profiles, |a| a.shape.to_string()),
            symmetry: join(profiles, |a| or_na(a.symmetry)),
            concavity: join(profiles, |a| or_na(a.concavity)),
            extreme_slope_class: join(profiles, |a| a.extreme_slope_class.label(a.polarity)),
            side_slope_class: join(profiles, |a| or_na(a.side_slope_class)),
            extreme_depth: join(profiles, |a| or_na(a.extreme_depth)),
            relief: join(profiles, |a| or_na(a.relief)),
            length: join(profiles, |a| or_na(a.length)),
        }
    }
}

/// Column names following the attribute table fields, e.g.
/// `profile_top_slope_class` for highs and `profile_bottom_depth` for lows.
pub fn attribute_header(polarity: Polarity) -> Vec<String> {
    let extreme = polarity.extreme_label();
    vec![
        "feature_id".to_string(),
        "profile_shape".to_string(),
        "profile_symmetry".to_string(),
        "profile_concavity".to_string(),
        format!("profile_{}_slope_class", extreme),
        "profile_side_slope_class".to_string(),
        format!("profile_{}_depth", extreme),
        "profile_relief".to_string(),
        "profile_length".to_string(),
    ]
}

pub fn attribute_rows(report: &BatchReport) -> Vec<FeatureAttributesRow> {
    report
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            FeatureOutcome::Classified {
                feature_id,
                profiles,
            } => Some(FeatureAttributesRow::new(feature_id, profiles)),
            FeatureOutcome::Failed { .. } => None,
        })
        .collect()
}

pub fn write_attributes_csv(
    report: &BatchReport,
    polarity: Polarity,
    output_path: &Path,
) -> Result<usize> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)?;
    wtr.write_record(attribute_header(polarity))?;

    let rows = attribute_rows(report);
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    info!("Wrote {} feature rows to {}", rows.len(), output_path.display());
    Ok(rows.len())
}

pub fn write_failures_csv(report: &BatchReport, output_path: &Path) -> Result<usize> {
    let mut wtr = Writer::from_path(output_path)?;
    let mut count = 0;

    for outcome in report.failed() {
        if let FeatureOutcome::Failed { feature_id, cause } = outcome {
            wtr.serialize(FailureRow {
                feature_id,
                error: cause,
            })?;
            count += 1;
        }
    }
    wtr.flush()?;

    Ok(count)
}
