//! Crowd levels reported by riders and a simple time-of-day predictor.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::identifiers::*;
use crate::models::types::{Result, TransitError};

/// How full a station or vehicle is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

impl CrowdLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Low => "Fluid",
            Self::Medium => "Moderate",
            Self::High => "Busy",
        }
    }

    fn score(&self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    fn from_average(average: f64) -> Self {
        if average <= 1.5 {
            Self::Low
        } else if average <= 2.5 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CrowdLevel {
    type Err = TransitError;

    /// Accepts the English names and the French report codes
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "faible" | "fluid" => Ok(Self::Low),
            "medium" | "moyen" | "moderate" => Ok(Self::Medium),
            "high" | "fort" | "busy" => Ok(Self::High),
            other => Err(TransitError::InvalidData(format!("Unknown crowd level: {}", other))),
        }
    }
}

/// Moderation state of a report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReportStatus {
    Pending,
    Approved,
    Rejected,
}

/// A rider's crowd report for a station, a line, or both
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrowdReport {
    pub station_id: Option<StationIdentifier>,
    pub line_id: Option<LineIdentifier>,
    pub level: CrowdLevel,
    pub status: ReportStatus,
    pub created_at: NaiveDateTime,
}

/// What a prediction is about
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredictionTarget {
    Station(StationIdentifier),
    Line(LineIdentifier),
    /// No specific place; always predicts a medium level
    Network,
}

impl PredictionTarget {
    fn matches(&self, report: &CrowdReport) -> bool {
        match self {
            Self::Station(id) => report.station_id.as_ref() == Some(id),
            Self::Line(id) => report.line_id.as_ref() == Some(id),
            Self::Network => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CrowdPrediction {
    pub level: CrowdLevel,
    /// 0.0 to 1.0, grows with the number of samples
    pub confidence: f64,
    pub sample_size: usize,
}

/// Confidence attached to a prediction built from `samples` reports
pub fn confidence(samples: usize) -> f64 {
    match samples {
        0 => 0.3,
        1..=4 => 0.5,
        5..=9 => 0.7,
        10..=19 => 0.85,
        _ => 0.95,
    }
}

/// Typical level at a given hour when nobody has reported anything
pub fn default_level_at(hour: u32) -> CrowdLevel {
    match hour {
        7..=9 | 17..=19 => CrowdLevel::High,
        10..=16 => CrowdLevel::Medium,
        _ => CrowdLevel::Low,
    }
}

/// Predicts crowd levels from recent approved reports
#[derive(Clone, Copy, Debug)]
pub struct CrowdPredictor {
    /// How far back reports are considered
    pub lookback: Duration,
    /// How many hours either side of the current one to try before
    /// averaging every sample
    pub hour_spread: u32,
}

impl Default for CrowdPredictor {
    fn default() -> Self {
        Self {
            lookback: Duration::weeks(1),
            hour_spread: 2,
        }
    }
}

impl CrowdPredictor {
    pub fn predict(
        &self,
        reports: &[CrowdReport],
        target: &PredictionTarget,
        now: NaiveDateTime,
    ) -> CrowdPrediction {
        if *target == PredictionTarget::Network {
            return CrowdPrediction {
                level: CrowdLevel::Medium,
                confidence: confidence(0),
                sample_size: 0,
            };
        }

        let since = now - self.lookback;
        let samples: Vec<&CrowdReport> = reports
            .iter()
            .filter(|r| r.status == ReportStatus::Approved)
            .filter(|r| r.created_at >= since && r.created_at <= now)
            .filter(|r| target.matches(r))
            .collect();

        tracing::debug!(
            prediction_target = ?target,
            samples = samples.len(),
            "predicting crowd level"
        );

        CrowdPrediction {
            level: self.level_for(&samples, now.hour()),
            confidence: confidence(samples.len()),
            sample_size: samples.len(),
        }
    }

    fn level_for(&self, samples: &[&CrowdReport], hour: u32) -> CrowdLevel {
        if samples.is_empty() {
            return default_level_at(hour);
        }

        let mut by_hour: HashMap<u32, Vec<&CrowdReport>> = HashMap::new();
        for report in samples {
            by_hour.entry(report.created_at.hour()).or_default().push(*report);
        }

        if let Some(current) = by_hour.get(&hour) {
            return average_level(current);
        }

        for offset in 1..=self.hour_spread {
            let later = (hour + offset) % 24;
            let earlier = (hour + 24 - offset % 24) % 24;
            if let Some(nearby) = by_hour.get(&later).or_else(|| by_hour.get(&earlier)) {
                return average_level(nearby);
            }
        }

        average_level(samples)
    }
}

fn average_level(reports: &[&CrowdReport]) -> CrowdLevel {
    if reports.is_empty() {
        return CrowdLevel::Medium;
    }
    let total: u32 = reports.iter().map(|r| r.level.score()).sum();
    CrowdLevel::from_average(total as f64 / reports.len() as f64)
}
