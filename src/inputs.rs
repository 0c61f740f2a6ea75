//! Plan inputs supplied by the caller
//!
//! A read-only snapshot of everything the generators need: the goal, a
//! four-week training history per sport, equipment access, and paces. Numeric
//! fields are optional; anything missing, non-finite, or non-positive is
//! treated as "no data".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculators::TrainingPaces;
use crate::error::{Result, TrainPlanError};
use crate::models::{Goal, GoalType, TrainingPhilosophy};

/// Experience and comfort levels are rated on this scale
pub const LEVEL_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

/// Returns the value only when it is a finite, positive number
pub fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Like [`usable`], but a missing value is an insufficient-data error
pub fn require(value: Option<f64>, calculation: &str, name: &str) -> Result<f64> {
    usable(value).ok_or_else(|| {
        TrainPlanError::insufficient_data(calculation, format!("no usable {}", name))
    })
}

/// Four weeks of history for one sport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SportHistory {
    /// Longest single session of each of the last four weeks, most recent first (meters)
    pub longest_session_by_week: [Option<f64>; 4],

    /// Average session distance over four weeks (meters)
    pub avg_distance_four_weeks: Option<f64>,

    /// Average session duration over four weeks (seconds)
    pub avg_duration_four_weeks: Option<f64>,

    /// Number of sessions over four weeks
    pub sessions_four_weeks: u32,
}

impl SportHistory {
    /// Longest usable session across the four weeks
    pub fn longest_in_four_weeks(&self) -> Option<f64> {
        self.longest_session_by_week
            .iter()
            .filter_map(|d| usable(*d))
            .reduce(f64::max)
    }

    /// True when the longest session did not drop over the last three weeks
    pub fn longest_session_increasing(&self) -> bool {
        match self.longest_session_by_week.map(usable) {
            [Some(w1), Some(w2), Some(w3), _] => w1 >= w2 && w2 >= w3,
            _ => false,
        }
    }

    /// Average weekly volume, in meters
    pub fn weekly_volume(&self) -> f64 {
        usable(self.avg_distance_four_weeks)
            .map(|avg| avg * self.sessions_four_weeks as f64 / 4.0)
            .unwrap_or(0.0)
    }
}

/// Paces in meters per minute
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaceInputs {
    pub long_run: Option<f64>,
    pub easy: Option<f64>,
    pub tempo: Option<f64>,
    /// Functional threshold pace: the pace that could be held for one hour
    pub threshold: Option<f64>,
    pub speed: Option<f64>,
    pub short_interval: Option<f64>,
}

impl From<TrainingPaces> for PaceInputs {
    fn from(paces: TrainingPaces) -> Self {
        Self {
            long_run: Some(paces.long_run),
            easy: Some(paces.easy),
            tempo: Some(paces.tempo),
            threshold: Some(paces.threshold),
            speed: Some(paces.speed),
            short_interval: Some(paces.short_interval),
        }
    }
}

/// Everything the plan generators read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanInputs {
    pub goal: Goal,
    pub goal_type: GoalType,
    pub goal_date: Option<NaiveDate>,
    pub weeks_until_goal: Option<f64>,
    /// Falls back to the configured default when absent
    pub training_philosophy: Option<TrainingPhilosophy>,

    /// English weekday name for the long run, any case
    pub preferred_long_run_day: Option<String>,

    pub age_years: Option<f64>,
    /// 1 (beginner) to 10 (very experienced)
    pub experience_level: Option<f64>,
    /// 1 to 10, how comfortable the athlete is with structured workouts
    pub structured_training_comfort_level: Option<f64>,

    pub has_bicycle: bool,
    pub has_swimming_pool_access: bool,
    pub has_open_water_swim_access: bool,

    pub running: SportHistory,
    pub cycling: SportHistory,
    pub swimming: SportHistory,

    /// Total estimated intensity of each of the last four weeks, most recent first
    pub total_intensity_by_week: [Option<f64>; 4],

    pub paces: PaceInputs,
    /// Functional threshold power, in watts
    pub threshold_power: Option<f64>,
}

impl PlanInputs {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let inputs: PlanInputs = serde_json::from_str(json)?;
        inputs.validate()?;
        Ok(inputs)
    }

    /// Rejects values that are present but outside their documented range
    pub fn validate(&self) -> Result<()> {
        for (name, level) in [
            ("experience level", self.experience_level),
            ("structured training comfort level", self.structured_training_comfort_level),
        ] {
            if let Some(level) = level {
                if !LEVEL_RANGE.contains(&level) {
                    return Err(TrainPlanError::Validation(format!(
                        "{} must be between 1 and 10, got {}",
                        name, level
                    )));
                }
            }
        }

        if let Some(weeks) = self.weeks_until_goal {
            if !weeks.is_finite() {
                return Err(TrainPlanError::Validation(
                    "weeks until goal must be a finite number".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Missing experience counts as a beginner
    pub fn experience(&self) -> f64 {
        self.experience_level.unwrap_or(1.0)
    }

    pub fn comfort(&self) -> f64 {
        self.structured_training_comfort_level.unwrap_or(1.0)
    }

    pub fn philosophy(&self) -> TrainingPhilosophy {
        self.training_philosophy.unwrap_or_default()
    }

    /// Weeks until the goal, when known and not negative
    pub fn weeks_until_goal(&self) -> Option<f64> {
        self.weeks_until_goal.filter(|w| w.is_finite() && *w >= 0.0)
    }

    /// Total intensity of the most recent week
    pub fn last_week_intensity(&self) -> Option<f64> {
        usable(self.total_intensity_by_week[0])
    }
}
