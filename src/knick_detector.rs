/// Knick-point detection - iteratively peel slope discontinuities off a profile
///
/// Every round compares, for each remaining sample, the mean slope towards all
/// remaining upstream samples with the mean slope towards all remaining
/// downstream samples. Samples whose difference clears the round's cutoff are
/// knick points; they are removed and the next round runs on what is left.
use crate::config::{KnickConfig, ThresholdCarry};
use crate::geometry::{distance, slope_angle_degrees};
use crate::profile::{Profile, ProfileSample};
use crate::stats::{mean, percentile};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnickCandidate {
    pub position: usize,
    pub diff_slope: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A round selected no new knick points
    Converged,
    /// Only the two endpoints are left in the working set
    EndpointsOnly,
    /// Every diff-slope of a round was NaN, so no cutoff could be derived
    InsufficientData,
}

#[derive(Debug, Clone)]
pub struct DetectionRound {
    pub working_set_size: usize,
    /// Threshold handed in from the previous round (initial slope for round 1)
    pub slope_threshold: f64,
    /// max(selection percentile, slope_threshold, floor)
    pub cutoff: f64,
    pub selected: Vec<KnickCandidate>,
}

#[derive(Debug, Clone)]
pub struct KnickDetection {
    /// Knick positions in the order they were found
    pub knick_positions: Vec<usize>,
    pub rounds: Vec<DetectionRound>,
    pub stop_reason: StopReason,
}

impl KnickDetection {
    /// Knick positions sorted ascending, ready for grouping
    pub fn sorted_positions(&self) -> Vec<usize> {
        let mut positions = self.knick_positions.clone();
        positions.sort_unstable();
        positions
    }
}

/// Magnitude of the slope between the highest and the lowest sample.
pub fn initial_slope_threshold(profile: &Profile) -> f64 {
    let top = profile.highest();
    let bottom = profile.lowest();
    let dist = distance(top.x, top.y, bottom.x, bottom.y);
    slope_angle_degrees(top.depth, bottom.depth, dist).abs()
}

/// `|upSlope - downSlope|` for every sample listed in `working` (ascending
/// positions). Endpoints of the working set have one empty side and get NaN.
pub fn diff_slopes(samples: &[ProfileSample], working: &[usize]) -> Vec<f64> {
    working
        .iter()
        .enumerate()
        .map(|(k, &i)| {
            let point = &samples[i];

            let up: Vec<f64> = working[..k]
                .iter()
                .map(|&j| {
                    let other = &samples[j];
                    let d = distance(point.x, point.y, other.x, other.y);
                    slope_angle_degrees(point.depth, other.depth, d)
                })
                .collect();

            let down: Vec<f64> = working[k + 1..]
                .iter()
                .map(|&j| {
                    let other = &samples[j];
                    let d = distance(point.x, point.y, other.x, other.y);
                    slope_angle_degrees(other.depth, point.depth, d)
                })
                .collect();

            (mean(&up) - mean(&down)).abs()
        })
        .collect()
}

pub fn detect_knick_points(profile: &Profile, config: &KnickConfig) -> KnickDetection {
    let samples = profile.samples();
    let mut working: Vec<usize> = (0..samples.len()).collect();
    let mut slope_threshold = initial_slope_threshold(profile);
    let mut first_carry: Option<f64> = None;
    let mut knick_positions = Vec::new();
    let mut rounds = Vec::new();

    let stop_reason = loop {
        if working.len() <= 2 {
            break StopReason::EndpointsOnly;
        }

        let diffs = diff_slopes(samples, &working);
        let (Some(selection), Some(carried)) = (
            percentile(&diffs, config.selection_percentile),
            percentile(&diffs, config.carry_percentile),
        ) else {
            break StopReason::InsufficientData;
        };

        let cutoff = selection.max(slope_threshold).max(config.min_diff_slope);
        // NaN never clears the cutoff, so working-set endpoints always survive
        let selected: Vec<KnickCandidate> = working
            .iter()
            .zip(&diffs)
            .filter(|(_, &diff)| diff >= cutoff)
            .map(|(&position, &diff_slope)| KnickCandidate {
                position,
                diff_slope,
            })
            .collect();

        debug!(
            round = rounds.len() + 1,
            remaining = working.len(),
            cutoff,
            selected = selected.len(),
            "knick detection round"
        );

        let found_any = !selected.is_empty();
        working.retain(|p| !selected.iter().any(|c| c.position == *p));
        knick_positions.extend(selected.iter().map(|c| c.position));
        rounds.push(DetectionRound {
            working_set_size: working.len() + selected.len(),
            slope_threshold,
            cutoff,
            selected,
        });

        if !found_any {
            break StopReason::Converged;
        }

        slope_threshold = match config.threshold_carry {
            ThresholdCarry::PreviousRound => carried,
            ThresholdCarry::FirstRound => *first_carry.get_or_insert(carried),
        };
    };

    KnickDetection {
        knick_positions,
        rounds,
        stop_reason,
    }
}
