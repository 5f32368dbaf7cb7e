//! Chart payloads for the results view.
//!
//! Only the data is produced here (frames, angles, series); any plotting
//! surface can draw it.

use serde::Serialize;
use std::f64::consts::TAU;

use crate::factors::{Factor, FactorSet};

pub const BAR_FRAMES: u32 = 100;
/// Headroom above the tallest bar.
pub const BAR_Y_PADDING: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarFrame {
    pub name: String,
    pub values: Vec<f64>,
}

/// Bars growing from 0 to their final score over `BAR_FRAMES` frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarAnimation {
    pub title: &'static str,
    pub labels: Vec<String>,
    pub y_max: f64,
    pub frames: Vec<BarFrame>,
}

pub fn bar_growth<S: AsRef<str>>(decisions: &[S], scores: &[f64]) -> BarAnimation {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y_max = (if max.is_finite() { max } else { 0.0 }) + BAR_Y_PADDING;

    let frames = (1..=BAR_FRAMES)
        .map(|frame| BarFrame {
            name: frame.to_string(),
            values: scores
                .iter()
                .map(|s| s * f64::from(frame) / f64::from(BAR_FRAMES))
                .collect(),
        })
        .collect();

    BarAnimation {
        title: "Decision Scores (Animated)",
        labels: decisions.iter().map(|d| d.as_ref().to_string()).collect(),
        y_max,
        frames,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub label: String,
    /// One value per axis, first value repeated at the end to close the polygon.
    pub values: Vec<f64>,
}

/// Factor trade-offs across decisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub title: &'static str,
    pub axes: Vec<Factor>,
    /// Evenly spaced from 0 over 2π, closed like the series.
    pub angles: Vec<f64>,
    pub series: Vec<RadarSeries>,
}

pub fn radar<S: AsRef<str>>(decisions: &[S], factors: &FactorSet) -> RadarChart {
    let axes = Factor::ALL.to_vec();
    let n = axes.len() as f64;

    let mut angles: Vec<f64> = (0..axes.len()).map(|i| TAU * i as f64 / n).collect();
    angles.push(angles[0]);

    let series = decisions
        .iter()
        .enumerate()
        .filter(|(i, _)| *i < factors.num_decisions())
        .map(|(i, label)| {
            let mut values: Vec<f64> = axes.iter().map(|&f| factors.values(f)[i]).collect();
            values.push(values[0]);
            RadarSeries {
                label: label.as_ref().to_string(),
                values,
            }
        })
        .collect();

    RadarChart {
        title: "Factor Trade-offs Across Decisions",
        axes,
        angles,
        series,
    }
}
